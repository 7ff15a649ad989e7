/// Arrow schemas for persisted section data.
pub mod settings {
    use arrow::datatypes::{DataType, Field, Schema};

    pub const TABLE: &str = "section_settings";

    /// Schema for the `section_settings` table: one row per (section, setting).
    pub fn section_settings_schema() -> Schema {
        Schema::new(vec![
            Field::new("section_id", DataType::UInt64, false),
            Field::new("context_id", DataType::UInt64, true),
            Field::new("setting_name", DataType::Utf8, false),
            Field::new("setting_value", DataType::Utf8, false),
        ])
    }
}

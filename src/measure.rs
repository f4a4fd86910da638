use crate::schema::EnumDescriptor;
use crate::transform::ModelData;
use unicode_width::UnicodeWidthStr;

pub struct TextMetrics {
    pub char_width: f64,
    pub line_height: f64,
    pub padding_x: f64,
    pub padding_y: f64,
    pub header_padding: f64,
    pub min_node_width: f64,
    pub min_node_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 27.0,
            padding_x: 8.0,
            padding_y: 4.0,
            header_padding: 4.0,
            min_node_width: 150.0,
            min_node_height: 40.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    pub fn header_height(&self) -> f64 {
        self.line_height + self.header_padding * 2.0
    }

    /// Box for a header line plus one row per (left, right) text pair.
    pub fn node_size(&self, label: &str, rows: &[(&str, &str)]) -> (f64, f64) {
        let header_width = self.text_width(label);

        let max_row_width = rows
            .iter()
            .map(|(left, right)| {
                self.text_width(left) + self.text_width(right) + self.char_width * 2.0
            })
            .fold(0.0, f64::max);

        let content_width = header_width.max(max_row_width) + self.padding_x * 2.0;
        let width = content_width.max(self.min_node_width);

        let body_height = if rows.is_empty() {
            0.0
        } else {
            rows.len() as f64 * self.line_height + self.padding_y * 2.0
        };

        let height = (self.header_height() + body_height).max(self.min_node_height);

        (width, height)
    }

    pub fn model_size(&self, model: &ModelData) -> (f64, f64) {
        let rows: Vec<(&str, &str)> = model
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.typ.as_str()))
            .collect();
        self.node_size(&model.name, &rows)
    }

    pub fn enum_size(&self, e: &EnumDescriptor) -> (f64, f64) {
        let rows: Vec<(&str, &str)> = e.values.iter().map(|v| (v.as_str(), "")).collect();
        self.node_size(&e.name, &rows)
    }
}

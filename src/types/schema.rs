use super::OutputRecord;

/// Storage type of an output attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType { Int, String, Double }

/// A named, typed attribute of the output layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputField {
    pub name: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> OutputField {
    OutputField { name, ty }
}

/// Fixed attribute schema of the output layer, in emission order.
pub const OUTPUT_FIELDS: [OutputField; 14] = [
    field("OBJECTID_1", FieldType::Int),
    field("OBJECTID", FieldType::Int),
    field("OZ ID", FieldType::String),
    field("Omega Zone", FieldType::String),
    field("World ABC", FieldType::String),
    field("Province", FieldType::String),
    field("Country", FieldType::String),
    field("Region", FieldType::String),
    field("Population", FieldType::Double),
    field("Number UBL", FieldType::Int),
    field("Population UBL", FieldType::Int),
    field("Perc_Pop UBL", FieldType::Double),
    field("Language Details", FieldType::String),
    field("Color", FieldType::String),
];

/// A single attribute value; `None` is a null (redacted) value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(Option<i64>),
    Double(Option<f64>),
    Text(Option<String>),
}

impl<G> OutputRecord<G> {
    /// Attribute values in `OUTPUT_FIELDS` order.
    pub fn attributes(&self) -> [AttrValue; 14] {
        let text = |s: &str| AttrValue::Text(Some(s.to_string()));
        [
            AttrValue::Int(Some(self.object_id_1)),
            AttrValue::Int(Some(self.object_id)),
            text(&self.oz_id),
            text(&self.omega_zone_name),
            text(&self.world_abc),
            text(&self.province),
            text(&self.country),
            text(&self.region),
            AttrValue::Double(Some(self.population)),
            AttrValue::Int(self.number_ubl.map(i64::from)),
            AttrValue::Int(self.population_ubl),
            AttrValue::Double(self.perc_pop_ubl),
            AttrValue::Text(self.language_details.as_ref().map(|d| d.to_string())),
            AttrValue::Text(self.color.clone()),
        ]
    }
}

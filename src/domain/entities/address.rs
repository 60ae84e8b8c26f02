//! Address entity returned by a CEP lookup.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized address for a single postal code.
///
/// Serializes as the flat object the HTTP API returns:
///
/// ```json
/// {"cep": "14784478", "logradouro": "...", "bairro": "...", "localidade": "...", "uf": "SP"}
/// ```
///
/// Every field is a plain string and defaults to `""` when the source omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "cep", default)]
    pub postal_code: String,
    #[serde(rename = "logradouro", default)]
    pub street: String,
    #[serde(rename = "bairro", default)]
    pub district: String,
    #[serde(rename = "localidade", default)]
    pub city: String,
    #[serde(rename = "uf", default)]
    pub state_code: String,
}

impl AddressRecord {
    /// Creates a new AddressRecord instance.
    pub fn new(
        postal_code: impl Into<String>,
        street: impl Into<String>,
        district: impl Into<String>,
        city: impl Into<String>,
        state_code: impl Into<String>,
    ) -> Self {
        Self {
            postal_code: postal_code.into(),
            street: street.into(),
            district: district.into(),
            city: city.into(),
            state_code: state_code.into(),
        }
    }

    /// Builds a record from an arbitrary upstream payload.
    ///
    /// Only `cep`, `logradouro`, `bairro`, `localidade` and `uf` are read; every other
    /// key is ignored. Values are copied verbatim with no validation.
    pub fn from_map(payload: &Map<String, Value>) -> Self {
        Self {
            postal_code: field(payload, "cep"),
            street: field(payload, "logradouro"),
            district: field(payload, "bairro"),
            city: field(payload, "localidade"),
            state_code: field(payload, "uf"),
        }
    }

    /// Converts the record into its string-keyed mapping form.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::with_capacity(5);
        map.insert("cep".into(), Value::String(self.postal_code.clone()));
        map.insert("logradouro".into(), Value::String(self.street.clone()));
        map.insert("bairro".into(), Value::String(self.district.clone()));
        map.insert("localidade".into(), Value::String(self.city.clone()));
        map.insert("uf".into(), Value::String(self.state_code.clone()));
        map
    }
}

/// Missing or `null` becomes `""`, strings pass through, other scalars keep their JSON text.
fn field(payload: &Map<String, Value>, key: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    #[test]
    fn test_from_map_full_payload() {
        let payload = as_map(json!({
            "cep": "14784-478",
            "logradouro": "Avenida Ranulfo Prata",
            "complemento": "",
            "bairro": "Jardim Universitário",
            "localidade": "Barretos",
            "uf": "SP",
            "ibge": "3505500",
            "ddd": "17"
        }));

        let record = AddressRecord::from_map(&payload);

        assert_eq!(record.postal_code, "14784-478");
        assert_eq!(record.street, "Avenida Ranulfo Prata");
        assert_eq!(record.district, "Jardim Universitário");
        assert_eq!(record.city, "Barretos");
        assert_eq!(record.state_code, "SP");
    }

    #[test]
    fn test_from_map_missing_fields_default_to_empty() {
        let payload = as_map(json!({ "cep": "14784478", "uf": "SP" }));

        let record = AddressRecord::from_map(&payload);

        assert_eq!(record, AddressRecord::new("14784478", "", "", "", "SP"));
    }

    #[test]
    fn test_from_map_empty_payload() {
        let record = AddressRecord::from_map(&Map::new());
        assert_eq!(record, AddressRecord::default());
    }

    #[test]
    fn test_from_map_null_and_non_string_values() {
        let payload = as_map(json!({
            "cep": 14784478,
            "logradouro": null,
            "bairro": true,
        }));

        let record = AddressRecord::from_map(&payload);

        assert_eq!(record.postal_code, "14784478");
        assert_eq!(record.street, "");
        assert_eq!(record.district, "true");
    }

    #[test]
    fn test_to_map_uses_api_keys() {
        let record = AddressRecord::new("01310100", "Avenida Paulista", "Bela Vista", "São Paulo", "SP");

        let map = record.to_map();

        assert_eq!(map.len(), 5);
        assert_eq!(map["cep"], "01310100");
        assert_eq!(map["logradouro"], "Avenida Paulista");
        assert_eq!(map["bairro"], "Bela Vista");
        assert_eq!(map["localidade"], "São Paulo");
        assert_eq!(map["uf"], "SP");
        assert_eq!(AddressRecord::from_map(&map), record);
    }

    #[test]
    fn test_serializes_flat_object() {
        let record = AddressRecord::new("14784478", "Rua A", "Centro", "Barretos", "SP");

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            json!({
                "cep": "14784478",
                "logradouro": "Rua A",
                "bairro": "Centro",
                "localidade": "Barretos",
                "uf": "SP"
            })
        );
    }
}

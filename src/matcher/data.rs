use crate::error::FillerError;

/// Flat mapping from human-meaningful keys ("first name", "email") to the
/// values to fill. Supplied once per run and read-only during traversal.
///
/// Entries keep insertion order: the matcher scans left to right and breaks
/// score ties in favor of the first key, so iteration order is part of the
/// matching contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataDictionary {
    entries: Vec<(String, String)>,
}

impl DataDictionary {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert or overwrite a key, preserving the position of existing keys.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a YAML or JSON file holding a flat mapping. The format is
    /// chosen by extension; everything scalar is stringified.
    pub fn from_file(path: &str) -> Result<Self, FillerError> {
        let content = std::fs::read_to_string(path).map_err(|e| FillerError::DataFile {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        if path.ends_with(".json") {
            let value: serde_json::Value =
                serde_json::from_str(&content).map_err(|e| FillerError::DataFile {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?;
            Self::from_json_value(&value).ok_or_else(|| FillerError::DataFile {
                path: path.to_string(),
                reason: "top-level value is not an object of scalars".into(),
            })
        } else {
            let value: serde_yaml::Value =
                serde_yaml::from_str(&content).map_err(|e| FillerError::DataFile {
                    path: path.to_string(),
                    reason: e.to_string(),
                })?;
            Self::from_yaml_value(&value).ok_or_else(|| FillerError::DataFile {
                path: path.to_string(),
                reason: "top-level value is not a mapping of scalars".into(),
            })
        }
    }

    pub fn from_json_value(value: &serde_json::Value) -> Option<Self> {
        let map = value.as_object()?;
        let mut dict = Self::new();
        for (key, val) in map {
            dict.insert(key.clone(), json_scalar(val)?);
        }
        Some(dict)
    }

    pub fn from_yaml_value(value: &serde_yaml::Value) -> Option<Self> {
        let map = value.as_mapping()?;
        let mut dict = Self::new();
        for (key, val) in map {
            let key = yaml_scalar(key)?;
            dict.insert(key, yaml_scalar(val)?);
        }
        Some(dict)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DataDictionary {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

fn json_scalar(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

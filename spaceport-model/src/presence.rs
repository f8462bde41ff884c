use crate::error::ModelError;

/// Collects the names of required fields that were absent from a payload.
///
/// Text fields that are present but blank count as missing.
#[derive(Debug, Default)]
pub struct MissingFields(Vec<&'static str>);

impl MissingFields {
    pub fn text(&mut self, name: &'static str, value: Option<String>) -> Option<String> {
        match value {
            Some(value) if !value.trim().is_empty() => Some(value),
            _ => {
                self.0.push(name);
                None
            }
        }
    }

    pub fn value<T>(&mut self, name: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.0.push(name);
        }
        value
    }

    /// Records a supplied-but-blank text field; absent fields are fine here.
    pub fn not_blank(&mut self, name: &'static str, value: Option<&String>) {
        if value.is_some_and(|value| value.trim().is_empty()) {
            self.0.push(name);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_error(self) -> ModelError {
        ModelError::MissingFields(self.0)
    }

    pub fn finish(self) -> Result<(), ModelError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_counts_as_missing() {
        let mut missing = MissingFields::default();
        assert_eq!(missing.text("a", Some("x".into())), Some("x".into()));
        assert_eq!(missing.text("b", Some("   ".into())), None);
        assert_eq!(missing.text("c", None), None);
        assert_eq!(missing.value("d", Some(1)), Some(1));
        assert_eq!(missing.value::<u8>("e", None), None);

        assert_eq!(
            missing.finish(),
            Err(ModelError::MissingFields(vec!["b", "c", "e"]))
        );
    }

    #[test]
    fn not_blank_ignores_absent_values() {
        let mut missing = MissingFields::default();
        missing.not_blank("a", None);
        missing.not_blank("b", Some(&"ok".to_string()));
        assert!(missing.is_empty());
        missing.not_blank("c", Some(&String::new()));
        assert!(!missing.is_empty());
    }
}

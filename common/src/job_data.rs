// Job data validation and conversion
//
// Every item is attempted so that the client receives the complete set of
// problems in one response. A converted map is only usable when no item
// failed.

use crate::input_types::InputTypeRegistry;
use crate::models::{JobDataItem, JobDataMap, JobDataValue, ValidationErrors};
use tracing::debug;

/// Result of converting a batch of job data items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobDataConversion {
    pub data: JobDataMap,
    pub errors: ValidationErrors,
}

impl JobDataConversion {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The converted map, or every validation error if any item failed.
    /// Partially converted data is dropped on failure.
    pub fn into_result(self) -> Result<JobDataMap, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(self.data)
        } else {
            Err(self.errors)
        }
    }
}

/// Convert all items through the registry.
///
/// For duplicate keys the last item wins, both in the data and in the errors.
pub fn convert_job_data(registry: &InputTypeRegistry, items: &[JobDataItem]) -> JobDataConversion {
    items
        .iter()
        .fold(JobDataConversion::default(), |mut acc, item| {
            match convert_item(registry, item) {
                Ok(value) => {
                    acc.data.insert(item.key.clone(), value);
                }
                Err(message) => {
                    debug!(
                        key = %item.key,
                        input_type = %item.input_type_code,
                        error = %message,
                        "Job data item rejected"
                    );
                    acc.errors.insert(item.key.clone(), message);
                }
            }
            acc
        })
}

/// Convert an optional batch; absence means no data map at all
pub fn convert_optional_job_data(
    registry: &InputTypeRegistry,
    items: Option<&[JobDataItem]>,
) -> Result<Option<JobDataMap>, ValidationErrors> {
    items
        .map(|items| convert_job_data(registry, items).into_result())
        .transpose()
}

fn convert_item(registry: &InputTypeRegistry, item: &JobDataItem) -> Result<JobDataValue, String> {
    // Only reachable when client and server disagree on the catalog
    let input_type = registry
        .lookup(&item.input_type_code)
        .ok_or_else(|| format!("Unknown input type: {}", item.input_type_code))?;

    input_type
        .converter
        .convert(&item.value)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConversionError;
    use crate::input_types::{Converter, InputType, ValueConverter};
    use serde_json::{json, Value};

    struct AlwaysFails;

    impl ValueConverter for AlwaysFails {
        fn convert(&self, _raw: &Value) -> Result<JobDataValue, ConversionError> {
            Err(ConversionError::new("converter exploded"))
        }
    }

    fn registry() -> InputTypeRegistry {
        let mut types = InputTypeRegistry::with_defaults().input_types().to_vec();
        types.push(InputType::new("broken", Converter::custom(AlwaysFails)));
        InputTypeRegistry::new(types)
    }

    #[test]
    fn test_all_items_converted() {
        let items = vec![
            JobDataItem::new("x", "42", "integer"),
            JobDataItem::new("name", "report", "string"),
            JobDataItem::new("enabled", "yes", "boolean"),
        ];

        let conversion = convert_job_data(&registry(), &items);

        assert!(conversion.is_valid());
        assert_eq!(conversion.data.len(), 3);
        assert_eq!(conversion.data["x"], JobDataValue::Integer(42));
        assert_eq!(conversion.data["name"], JobDataValue::Raw(json!("report")));
        assert_eq!(conversion.data["enabled"], JobDataValue::Boolean(true));
    }

    #[test]
    fn test_unknown_input_type_is_validation_error() {
        let items = vec![JobDataItem::new("x", "42", "foo")];

        let conversion = convert_job_data(&registry(), &items);

        assert!(conversion.data.is_empty());
        assert_eq!(conversion.errors["x"], "Unknown input type: foo");
    }

    #[test]
    fn test_no_short_circuit_on_first_failure() {
        let items = vec![
            JobDataItem::new("a", "not-a-number", "integer"),
            JobDataItem::new("b", "1", "integer"),
            JobDataItem::new("c", "anything", "broken"),
            JobDataItem::new("d", "x", "missing"),
        ];

        let conversion = convert_job_data(&registry(), &items);

        assert_eq!(conversion.errors.len(), 3);
        assert_eq!(conversion.errors["a"], "'not-a-number' is not a valid integer");
        assert_eq!(conversion.errors["c"], "converter exploded");
        assert_eq!(conversion.errors["d"], "Unknown input type: missing");
        assert!(!conversion.errors.contains_key("b"));
        assert_eq!(conversion.data["b"], JobDataValue::Integer(1));
    }

    #[test]
    fn test_failed_conversion_discards_data() {
        let items = vec![
            JobDataItem::new("good", "1", "integer"),
            JobDataItem::new("bad", "x", "integer"),
        ];

        let errors = convert_job_data(&registry(), &items)
            .into_result()
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("bad"));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let items = vec![
            JobDataItem::new("x", "1", "integer"),
            JobDataItem::new("x", "2", "integer"),
            JobDataItem::new("y", "a", "integer"),
            JobDataItem::new("y", "b", "foo"),
        ];

        let conversion = convert_job_data(&registry(), &items);

        assert_eq!(conversion.data["x"], JobDataValue::Integer(2));
        assert_eq!(conversion.errors["y"], "Unknown input type: foo");
    }

    #[test]
    fn test_absent_and_empty_batches() {
        let registry = registry();
        assert_eq!(convert_optional_job_data(&registry, None), Ok(None));
        assert_eq!(
            convert_optional_job_data(&registry, Some(&[][..])),
            Ok(Some(JobDataMap::new()))
        );
    }
}

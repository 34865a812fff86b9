use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::config::ALL_SELECTOR;
use crate::models::StudentRecord;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClassSelector {
    #[default]
    All,
    Class(String),
}

impl ClassSelector {
    pub fn label(&self) -> &str {
        match self {
            ClassSelector::All => ALL_SELECTOR,
            ClassSelector::Class(class) => class,
        }
    }

    /// Whether this selector is one of the offered options.
    pub fn is_known(&self, options: &[String]) -> bool {
        options.iter().any(|option| option == self.label())
    }
}

impl FromStr for ClassSelector {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value == ALL_SELECTOR {
            Ok(ClassSelector::All)
        } else {
            Ok(ClassSelector::Class(value.to_string()))
        }
    }
}

impl fmt::Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rows matching the selector, in source order. Unknown classes match nothing.
pub fn filter_records<'a>(
    records: &'a [StudentRecord],
    selector: &ClassSelector,
) -> Vec<&'a StudentRecord> {
    let filtered: Vec<&StudentRecord> = match selector {
        ClassSelector::All => records.iter().collect(),
        ClassSelector::Class(class) => records.iter().filter(|r| &r.class == class).collect(),
    };

    debug!(
        "Selector {} kept {} of {} students",
        selector,
        filtered.len(),
        records.len()
    );
    filtered
}

use log::{debug, warn};

use crate::aggregate::{aggregate, round2};
use crate::dataset::class_options;
use crate::filter::{filter_records, ClassSelector};
use crate::models::{DerivedView, ProfileCard, StudentRecord};

/// One filter -> aggregate pass, discarded once presented.
#[derive(Debug)]
pub struct Cycle<'a> {
    pub selector: ClassSelector,
    pub options: &'a [String],
    pub records: Vec<&'a StudentRecord>,
    pub view: DerivedView<'a>,
}

impl Cycle<'_> {
    pub fn profile_cards(&self) -> Vec<ProfileCard> {
        self.records
            .iter()
            .map(|r| ProfileCard {
                name: r.name.clone(),
                class: r.class.clone(),
                profile: r.profile.clone(),
                average: round2(r.average()),
            })
            .collect()
    }
}

/// Holds the read-only dataset and the last selection.
pub struct Session<'a> {
    records: &'a [StudentRecord],
    options: Vec<String>,
    selector: ClassSelector,
}

impl<'a> Session<'a> {
    pub fn new(records: &'a [StudentRecord]) -> Self {
        Self {
            records,
            options: class_options(records),
            selector: ClassSelector::All,
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selector(&self) -> &ClassSelector {
        &self.selector
    }

    /// Record a new selection and recompute everything from scratch.
    pub fn select(&mut self, selector: ClassSelector) -> Cycle<'_> {
        if !selector.is_known(&self.options) {
            warn!("Class {} is not in the dataset; nothing will match", selector);
        }
        self.selector = selector;
        self.current()
    }

    /// Recompute with the last selection.
    pub fn current(&self) -> Cycle<'_> {
        debug!("Running cycle for selector {}", self.selector);
        let records = filter_records(self.records, &self.selector);
        let view = aggregate(&records);

        Cycle {
            selector: self.selector.clone(),
            options: &self.options,
            records,
            view,
        }
    }
}

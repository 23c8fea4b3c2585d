use url::Url;

use crate::sync;
use crate::taxonomy::{InputType, InstanceId};

// ------------- Selection -------------
/// What a control currently applies: one raw term id for a select, an
/// ordered set of them for a checkbox group. An empty string is "nothing".
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Selection {
    Single(String),
    Multi(Vec<String>),
}

impl Selection {
    pub fn empty(input_type: InputType) -> Self {
        if input_type.is_multi() {
            Selection::Multi(Vec::new())
        } else {
            Selection::Single(String::new())
        }
    }
    /// Builds a selection from values read off the URL.
    pub fn from_values(input_type: InputType, mut values: Vec<String>) -> Self {
        if input_type.is_multi() {
            Selection::Multi(values)
        } else if values.is_empty() {
            Selection::Single(String::new())
        } else {
            Selection::Single(values.swap_remove(0))
        }
    }
    pub fn values(&self) -> Vec<&str> {
        match self {
            Selection::Single(value) if value.is_empty() => Vec::new(),
            Selection::Single(value) => vec![value.as_str()],
            Selection::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }
    pub fn joined(&self) -> String {
        self.values().join(",")
    }
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

// ------------- Controls -------------
/// The element a change event came from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Control {
    Checkbox { group: String, value: String },
    Value(String),
}

/// Read access to every checkbox rendered on the page, by group name.
pub trait CheckboxGroup {
    fn checked_values(&self, group: &str) -> Vec<String>;
}

#[derive(Clone, Debug)]
struct Checkbox {
    group: String,
    value: String,
    checked: bool,
}

/// Checkbox state as rendered, in document order.
#[derive(Clone, Debug, Default)]
pub struct CheckboxSet {
    boxes: Vec<Checkbox>,
}

impl CheckboxSet {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add(&mut self, group: &str, value: &str, checked: bool) {
        self.boxes.push(Checkbox { group: group.to_string(), value: value.to_string(), checked });
    }
    /// Flips one box and returns the control that fired, ready to be handed
    /// to [`FilterStore::on_change`].
    pub fn toggle(&mut self, group: &str, value: &str) -> Option<Control> {
        let checkbox = self.boxes.iter_mut().find(|c| c.group == group && c.value == value)?;
        checkbox.checked = !checkbox.checked;
        Some(Control::Checkbox { group: group.to_string(), value: value.to_string() })
    }
}

impl CheckboxGroup for CheckboxSet {
    fn checked_values(&self, group: &str) -> Vec<String> {
        self.boxes
            .iter()
            .filter(|c| c.group == group && c.checked)
            .map(|c| c.value.clone())
            .collect()
    }
}

// ------------- Store -------------
/// Selection state of one filter instance for one page view.
#[derive(Debug)]
pub struct FilterStore {
    input_type: InputType,
    selection: Selection,
    has_hydrated: bool,
}

impl FilterStore {
    pub fn new(input_type: InputType, selection: Selection) -> Self {
        Self {
            input_type,
            selection,
            has_hydrated: false,
        }
    }
    /// Starts from whatever the URL currently applies for this instance.
    pub fn hydrate(location: &Url, list_id: &str, instance_id: InstanceId, input_type: InputType) -> Self {
        let values = sync::read(location, list_id, instance_id);
        Self::new(input_type, Selection::from_values(input_type, values))
    }
    pub fn input_type(&self) -> InputType {
        self.input_type
    }
    pub fn current_selection(&self) -> &Selection {
        &self.selection
    }
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }
    /// Applies a change event. A checkbox rescans its whole group instead of
    /// trusting the toggled box alone.
    pub fn on_change(&mut self, control: &Control, checkboxes: &dyn CheckboxGroup) {
        let selection = match control {
            Control::Checkbox { group, .. } => Selection::Multi(checkboxes.checked_values(group)),
            Control::Value(value) => Selection::Single(value.clone()),
        };
        self.set_selection(selection);
    }
    pub fn has_hydrated(&self) -> bool {
        self.has_hydrated
    }
    // true only the first time it is called for this store
    pub(crate) fn finish_hydration(&mut self) -> bool {
        let first = !self.has_hydrated;
        self.has_hydrated = true;
        first
    }
}

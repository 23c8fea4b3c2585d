//! Keeps filter selections and the address bar in step.
//!
//! Every filter instance owns one query parameter, `<list>-term-<instance>`,
//! holding its term ids joined by commas. The list's page parameter,
//! `<list>-page`, goes back to `1` whenever a filter changes.
//!
//! Navigation is split in two phases. [`FilterController::watch`] is pure
//! bookkeeping: it decides whether this pass navigates at all, computes the
//! target URL and claims a ticket on the shared [`Location`]. Running the
//! returned [`PendingNavigation`] performs the effect. A ticket that is no
//! longer the latest one when its navigation finishes does not touch the
//! location, so the last requested target wins.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use crate::error::Result;
use crate::store::{CheckboxGroup, Control, FilterStore, Selection};
use crate::taxonomy::{InputType, InstanceId};

lazy_static! {
    static ref TERM_PARAMETER: Regex = Regex::new(r"^(?P<list>.+)-term-(?P<instance>\d+)$").unwrap();
}

// ------------- Parameter names -------------
pub fn list_id(prefix: &str, query_id: u64) -> String {
    format!("{prefix}-{query_id}")
}
pub fn term_parameter(list_id: &str, instance_id: InstanceId) -> String {
    format!("{list_id}-term-{instance_id}")
}
pub fn page_parameter(list_id: &str) -> String {
    format!("{list_id}-page")
}
/// Name shared by all checkboxes of one instance.
pub fn checkbox_group(prefix: &str, instance_id: InstanceId) -> String {
    format!("{prefix}-{instance_id}-term[]")
}

/// Splits a term parameter name into its list id and instance id. The
/// instance part must be written the way [`term_parameter`] writes it, so
/// `list-term-02` names no instance.
pub fn parse_term_parameter(name: &str) -> Option<(&str, InstanceId)> {
    let captures = TERM_PARAMETER.captures(name)?;
    let list = captures.name("list")?.as_str();
    let digits = captures.name("instance")?.as_str();
    let instance = digits.parse::<InstanceId>().ok()?;
    if instance.to_string() != digits {
        return None;
    }
    Some((list, instance))
}

/// Splits a comma joined parameter value, dropping empty pieces.
pub fn split_values(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

// ------------- Codec -------------
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParamUpdate {
    pub key: String,
    pub value: String,
}

impl ParamUpdate {
    pub fn new(key: String, value: String) -> Self {
        Self { key, value }
    }
}

/// The selection `location` applies to one instance.
pub fn read(location: &Url, list_id: &str, instance_id: InstanceId) -> Vec<String> {
    let key = term_parameter(list_id, instance_id);
    location
        .query_pairs()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| split_values(&v))
        .unwrap_or_default()
}

/// Applies `updates` to a copy of `location`. Updated keys are moved to the
/// end of the query in update order; an empty value removes the key.
pub fn write(location: &Url, updates: &[ParamUpdate]) -> Url {
    let kept: Vec<(String, String)> = location
        .query_pairs()
        .filter(|(k, _)| !updates.iter().any(|u| u.key == *k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut target = location.clone();
    {
        let mut pairs = target.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(kept);
        for update in updates.iter().filter(|u| !u.value.is_empty()) {
            pairs.append_pair(&update.key, &update.value);
        }
    }
    if target.query() == Some("") {
        target.set_query(None);
    }
    target
}

/// Where a selection change for `instance_id` navigates to.
pub fn navigation_target(location: &Url, list_id: &str, instance_id: InstanceId, selection: &Selection) -> Url {
    write(
        location,
        &[
            ParamUpdate::new(term_parameter(list_id, instance_id), selection.joined()),
            ParamUpdate::new(page_parameter(list_id), "1".to_string()),
        ],
    )
}

// ------------- Navigation -------------
/// Client side route change, supplied by the host.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, target: &Url) -> Result<()>;
}

/// The page's address bar, shared by every filter instance on the page.
#[derive(Debug)]
pub struct Location {
    current: Mutex<Url>,
    latest: AtomicU64,
}

impl Location {
    pub fn new(url: Url) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(url),
            latest: AtomicU64::new(0),
        })
    }
    pub fn parse(url: &str) -> Result<Arc<Self>> {
        Ok(Self::new(Url::parse(url)?))
    }
    pub fn current(&self) -> Url {
        self.current.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
    fn claim(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }
    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
    fn commit(&self, ticket: u64, target: &Url) -> bool {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_latest(ticket) {
            return false;
        }
        *current = target.clone();
        true
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NavigationOutcome {
    Applied(Url),
    Superseded,
    /// The selection still holds locally; the address bar was left as is.
    Failed(String),
}

/// A computed navigation that has not run yet.
#[derive(Debug)]
pub struct PendingNavigation {
    location: Arc<Location>,
    ticket: u64,
    target: Url,
}

impl PendingNavigation {
    pub fn target(&self) -> &Url {
        &self.target
    }
    pub async fn run<N>(self, navigator: &N) -> NavigationOutcome
    where
        N: Navigator + ?Sized,
    {
        if !self.location.is_latest(self.ticket) {
            debug!(url=%self.target, "navigation superseded before start");
            return NavigationOutcome::Superseded;
        }
        if let Err(e) = navigator.navigate(&self.target).await {
            warn!(error=%e, url=%self.target, "navigation failed");
            return NavigationOutcome::Failed(e.to_string());
        }
        if self.location.commit(self.ticket, &self.target) {
            NavigationOutcome::Applied(self.target)
        } else {
            debug!(url=%self.target, "navigation superseded");
            NavigationOutcome::Superseded
        }
    }
}

// ------------- Controller -------------
/// One mounted filter control: its store plus the URL it synchronizes with.
#[derive(Debug)]
pub struct FilterController {
    list_id: String,
    instance_id: InstanceId,
    store: FilterStore,
    location: Arc<Location>,
}

impl FilterController {
    pub fn mount(list_id: &str, instance_id: InstanceId, input_type: InputType, location: Arc<Location>) -> Self {
        let store = FilterStore::hydrate(&location.current(), list_id, instance_id, input_type);
        Self {
            list_id: list_id.to_string(),
            instance_id,
            store,
            location,
        }
    }
    pub fn store(&self) -> &FilterStore {
        &self.store
    }
    pub fn on_change(&mut self, control: &Control, checkboxes: &dyn CheckboxGroup) {
        self.store.on_change(control, checkboxes);
    }
    /// Runs after mount and after every selection change. The pass right
    /// after mount only reflects the URL, so it never navigates.
    pub fn watch(&mut self) -> Option<PendingNavigation> {
        if self.store.finish_hydration() {
            debug!(list=%self.list_id, instance=self.instance_id, "initial pass, no navigation");
            return None;
        }
        let target = navigation_target(
            &self.location.current(),
            &self.list_id,
            self.instance_id,
            self.store.current_selection(),
        );
        let ticket = self.location.claim();
        Some(PendingNavigation {
            location: Arc::clone(&self.location),
            ticket,
            target,
        })
    }
    /// [`Self::watch`] followed by the navigation it asks for, if any.
    pub async fn settle<N>(&mut self, navigator: &N) -> Option<NavigationOutcome>
    where
        N: Navigator + ?Sized,
    {
        let pending = self.watch()?;
        Some(pending.run(navigator).await)
    }
}

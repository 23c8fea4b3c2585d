//! Taxfilter – taxonomy filters for listing blocks.
//!
//! A listing block shows posts; filter controls placed inside it let a
//! visitor narrow that list by category or tag without a full page reload.
//! Three pieces of state have to agree at all times:
//! * the selection held by each control ([`store::FilterStore`]),
//! * the address bar, one `<list>-term-<instance>` parameter per control
//!   ([`sync`]),
//! * the taxonomy clauses of the list's query on the next request
//!   ([`clauses`]).
//!
//! ## Modules
//! * [`taxonomy`] – Terms, taxonomies and the design-time configuration of a control.
//! * [`catalog`] – The injected term lookup capability, with a pending state.
//! * [`resolver`] – Typed labels to term ids (exact, then case insensitive).
//! * [`expander`] – Selected terms or their direct children.
//! * [`options`] – The options one control offers for the current request.
//! * [`store`] – Per view selection state, fed by change events.
//! * [`sync`] – URL codec and last-write-wins client side navigation.
//! * [`clauses`] – Request parameters to taxonomy clauses.
//! * [`tree`] – Block tree search and the list block injection gate.
//! * [`settings`], [`server`] – Configuration and the HTTP surface of the binary.
//!
//! ## Quick Start
//! ```
//! use taxfilter::clauses::{build, InstanceConfigs, ListQueryContext};
//! use taxfilter::taxonomy::Taxonomy;
//! let mut configs = InstanceConfigs::default();
//! configs.insert(2, Taxonomy::Category);
//! let context = ListQueryContext::from_query("list", "list-term-2=7%2C9&other-term-2=5");
//! let clauses = build(&context, &configs);
//! assert_eq!(clauses.len(), 1);
//! assert_eq!(clauses[0].terms, vec!["7", "9"]);
//! ```

pub mod error;
pub mod taxonomy;
pub mod catalog;
pub mod resolver;
pub mod expander;
pub mod options;
pub mod store;
pub mod sync;
pub mod clauses;
pub mod tree;
pub mod settings;
pub mod server;

pub use error::{FilterError, Result};

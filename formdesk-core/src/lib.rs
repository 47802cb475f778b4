//! Formdesk core: the listing engine behind the admin front end.
//!
//! Everything here is synchronous and free of I/O. Records arrive as JSON
//! objects from the REST backend, get filtered and paginated into a visible
//! page, and leave again as create/update bodies built by the form modal.

pub mod banner;
pub mod confirm;
pub mod dates;
pub mod error;
pub mod filter;
pub mod form;
pub mod listing;
pub mod operator;
pub mod paginate;
pub mod record;
pub mod resource;

pub use banner::{Banner, BannerLevel, BannerSlot, DEFAULT_BANNER_TTL_MS};
pub use confirm::DeleteConfirm;
pub use dates::{parse_calendar_date, parse_record_date, DateRange};
pub use error::{FormError, FormdeskError, FormdeskResult, RecordError};
pub use filter::{FieldDisplay, ListFilter, RawFields};
pub use form::{DerivedLookup, FormModal, FormMode, Submission};
pub use listing::{FetchOutcome, FetchTicket, ListView, ListingState, LoadState, TableBody};
pub use operator::Operator;
pub use paginate::{Pagination, RowsPerPage};
pub use record::{Record, RecordId};
pub use resource::{
    ChoiceSource, Column, EntityProfile, FieldKind, FieldSpec, Resource, StatusScope,
};

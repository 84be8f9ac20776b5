pub mod cte_entry;
pub mod field;
pub mod occurrence;
pub mod operation;
pub mod operation_kind;
pub mod toll;

pub use cte_entry::CteEntry;
pub use field::{Field, FieldKind, Schema};
pub use occurrence::OccurrenceRecord;
pub use operation::{OperationRecord, OperationSet};
pub use operation_kind::OperationKind;
pub use toll::{GeoPoint, TollPlaza};

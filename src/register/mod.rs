mod column;
mod index;
mod level;
mod pcode;
mod register;
mod status;
mod unit;

pub use column::{normalize_header, Column};
pub use index::{AncestorIndex, Ancestry};
pub use level::AdminLevel;
pub use pcode::{format_segment, pad_code, PCode, COUNTRY_PREFIX};
pub use register::Register;
pub use status::Status;
pub use unit::AdminUnit;

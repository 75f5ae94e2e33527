//! Built-in value types.

mod enumeration;
mod list;
mod primitive;
mod string;
mod trilean;

pub use enumeration::{EnumValue, Normalizer, normalize_enum_name};
pub use list::{
    ColoredStringListValue, DEFAULT_DELIMITER, ListOptions, ListOptionsBuilder,
    ListOptionsBuilderError, ListValue, StringListValue,
};
pub use primitive::{BooleanValue, DoubleValue, FloatValue, IntegerValue, LongValue};
pub use string::{ColoredStringValue, StringValue};
pub use trilean::{Trilean, TrileanValue};

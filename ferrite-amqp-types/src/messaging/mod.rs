//! Types defined in AMQP 1.0 specification Part 3: Messaging

use ferrite_amqp_codec::{
    primitives::{Array, Symbol},
    Value,
};

mod sections;
mod source;
mod target;
mod term_expiry_policy;
mod terminus_durability;

pub use sections::{decode_sections, SectionError, Sections};
pub use source::{Source, SourceBuilder};
pub use target::{Target, TargetBuilder};
pub use term_expiry_policy::TerminusExpiryPolicy;
pub use terminus_durability::TerminusDurability;

/// 3.5.8 Address String
///
/// The terminus addresses used here are strings; broker-specific address
/// syntaxes are opaque to the link layer.
pub type Address = String;

/// Fields declared `multiple="true"` arrive either as a single symbol or as
/// an array of symbols.
pub(crate) fn symbol_array_from_value(value: Value) -> Result<Array<Symbol>, Value> {
    match value {
        Value::Symbol(sym) => Ok(Array(vec![sym])),
        Value::String(s) => Ok(Array(vec![Symbol::from(s)])),
        Value::Array(values) => values
            .into_inner()
            .into_iter()
            .map(|v| match v {
                Value::Symbol(sym) => Ok(sym),
                Value::String(s) => Ok(Symbol::from(s)),
                other => Err(other),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Array),
        other => Err(other),
    }
}

pub(crate) fn symbol_array_to_value(values: &Array<Symbol>) -> Value {
    Value::Array(Array(
        values.iter().map(|s| Value::Symbol(s.clone())).collect(),
    ))
}

// Input type registry and value converters

pub mod converter;
pub mod registry;

pub use converter::{
    BooleanConverter, Converter, ConverterKind, DateTimeConverter, FloatConverter,
    IntegerConverter, RegexConverter, ValueConverter,
};
pub use registry::{InputType, InputTypeRegistry, InputTypeVariant};

use crate::{DbType, IdentifierStrategy, Result, Value};
use std::marker::PhantomData;

/// The table marker of a type: `#[minnow(table = "..", schema = "..")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAttribute {
    pub name: String,
    pub schema: Option<String>,
}

/// The column marker of a property.
///
/// Its presence is what the attribute convention maps. The convention based
/// mapping reads it only for explicit overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAttribute {
    pub name: Option<String>,
    /// `Some` marks the identifier column.
    pub identifier: Option<IdentifierStrategy>,
    pub sequence: Option<String>,
    pub allow_insert: bool,
    pub allow_update: bool,
    pub db_type: Option<DbType>,
    pub version: bool,
}

impl Default for ColumnAttribute {
    fn default() -> Self {
        Self {
            name: None,
            identifier: None,
            sequence: None,
            allow_insert: true,
            allow_update: true,
            db_type: None,
            version: false,
        }
    }
}

/// Static information about one property of a mapped type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    /// Typed null of the property type.
    pub value: Value,
    /// The property is an `Option`.
    pub nullable: bool,
    pub column: Option<ColumnAttribute>,
}

/// Type erased description of a mapped type, the input of a
/// [`crate::MappingConvention`].
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub type_name: &'static str,
    pub table: Option<TableAttribute>,
    pub properties: Vec<PropertyDescriptor>,
    pub has_constructor: bool,
}

impl TypeDescriptor {
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|v| v.name == name)
    }
}

/// Reads and writes one property of `T`.
pub struct PropertyAccessor<T> {
    pub get: fn(&T) -> Value,
    pub set: fn(&mut T, Value) -> Result<()>,
}

impl<T> PropertyAccessor<T> {
    pub fn new(get: fn(&T) -> Value, set: fn(&mut T, Value) -> Result<()>) -> Self {
        Self { get, set }
    }
}

impl<T> Clone for PropertyAccessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyAccessor<T> {}

/// Descriptor plus the accessors and constructor of `T`.
pub struct TypeDefinition<T> {
    descriptor: TypeDescriptor,
    accessors: Vec<PropertyAccessor<T>>,
    constructor: Option<fn() -> T>,
}

impl<T> TypeDefinition<T> {
    pub fn new(
        type_name: &'static str,
        table: Option<TableAttribute>,
        properties: Vec<(PropertyDescriptor, PropertyAccessor<T>)>,
        constructor: Option<fn() -> T>,
    ) -> Self {
        let (properties, accessors) = properties.into_iter().unzip();
        Self {
            descriptor: TypeDescriptor {
                type_name,
                table,
                properties,
                has_constructor: constructor.is_some(),
            },
            accessors,
            constructor,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn accessor(&self, property: &str) -> Option<PropertyAccessor<T>> {
        self.descriptor
            .properties
            .iter()
            .position(|v| v.name == property)
            .map(|i| self.accessors[i])
    }

    pub fn constructor(&self) -> Option<fn() -> T> {
        self.constructor
    }
}

/// A struct that can be mapped to a table.
///
/// Usually implemented through `#[derive(Mapped)]`. The definition is
/// requested once per registry and cached.
pub trait Mapped: Sized + Send + Sync + 'static {
    fn type_definition() -> TypeDefinition<Self>;
}

/// Finds out at compile time whether `T` has a parameterless constructor.
///
/// ```rust
/// use minnow_core::{ConstructorProbe, NoConstructor};
///
/// #[derive(Default)]
/// struct WithDefault;
/// struct WithoutDefault;
///
/// assert!(ConstructorProbe::<WithDefault>::new().constructor().is_some());
/// assert!(ConstructorProbe::<WithoutDefault>::new().constructor().is_none());
/// ```
pub struct ConstructorProbe<T>(PhantomData<T>);

impl<T> ConstructorProbe<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for ConstructorProbe<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> ConstructorProbe<T> {
    // Preferred over the trait method when T has Default
    pub fn constructor(&self) -> Option<fn() -> T> {
        Some(T::default as fn() -> T)
    }
}

pub trait NoConstructor<T> {
    fn constructor(&self) -> Option<fn() -> T> {
        None
    }
}

impl<T> NoConstructor<T> for ConstructorProbe<T> {}

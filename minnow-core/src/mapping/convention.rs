use crate::{
    ColumnInfo, DbType, EnglishInflectionService, IdentifierStrategy, InflectionService,
    PropertyDescriptor, Result, TableInfo, TypeDescriptor, mapping::check_constructor,
};
use convert_case::{Case, Casing};

/// Derives the table metadata of a type.
///
/// A registry holds exactly one convention, every type it maps goes through it.
pub trait MappingConvention: Send + Sync {
    fn create_table_info(&self, descriptor: &TypeDescriptor) -> Result<TableInfo>;
}

pub type PropertyPredicate = Box<dyn Fn(&TypeDescriptor, &PropertyDescriptor) -> bool + Send + Sync>;

/// Resolver functions of [`ConventionMappingConvention`].
///
/// Start from a preset and replace what differs:
///
/// ```rust
/// use minnow_core::{ConventionMappingSettings, IdentifierStrategy};
///
/// let settings = ConventionMappingSettings::lowercase_with_underscores()
///     .with_table_schema(|_| Some("sales".into()))
///     .with_identifier_strategy(|_| IdentifierStrategy::Assigned)
///     .with_ignore(|_, property| property.name.starts_with("cached_"));
/// ```
pub struct ConventionMappingSettings {
    pub ignore: PropertyPredicate,
    pub is_identifier: PropertyPredicate,
    pub allow_insert: PropertyPredicate,
    pub allow_update: PropertyPredicate,
    pub resolve_table_name: Box<dyn Fn(&TypeDescriptor) -> String + Send + Sync>,
    pub resolve_table_schema: Box<dyn Fn(&TypeDescriptor) -> Option<String> + Send + Sync>,
    pub resolve_column_name: Box<dyn Fn(&PropertyDescriptor) -> String + Send + Sync>,
    pub resolve_identifier_column_name:
        Box<dyn Fn(&TypeDescriptor, &PropertyDescriptor) -> String + Send + Sync>,
    pub resolve_identifier_strategy: Box<dyn Fn(&TypeDescriptor) -> IdentifierStrategy + Send + Sync>,
    pub resolve_sequence_name:
        Box<dyn Fn(&TypeDescriptor, &PropertyDescriptor) -> Option<String> + Send + Sync>,
    pub resolve_db_type: Box<dyn Fn(&PropertyDescriptor) -> DbType + Send + Sync>,
}

macro_rules! setter {
    ($(#[$doc:meta])* $name:ident, $field:ident, ($($arg:ty),*) -> $ret:ty) => {
        $(#[$doc])*
        pub fn $name(mut self, f: impl Fn($($arg),*) -> $ret + Send + Sync + 'static) -> Self {
            self.$field = Box::new(f);
            self
        }
    };
}

fn normalized(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// `id` or `{type}_id`, in any casing.
fn is_conventional_identifier(descriptor: &TypeDescriptor, property: &PropertyDescriptor) -> bool {
    let name = normalized(property.name);
    name == "id" || name == normalized(descriptor.type_name) + "id"
}

impl ConventionMappingSettings {
    /// Tables named after the pluralized type (`Customers`), columns in
    /// pascal case (`DateOfBirth`).
    pub fn new() -> Self {
        Self::with_casing(None, Case::Pascal)
    }

    /// `customers` and `date_of_birth`.
    pub fn lowercase_with_underscores() -> Self {
        Self::with_casing(Some(Case::Snake), Case::Snake)
    }

    /// `CUSTOMERS` and `DATE_OF_BIRTH`.
    pub fn uppercase_with_underscores() -> Self {
        Self::with_casing(Some(Case::UpperSnake), Case::UpperSnake)
    }

    fn with_casing(table_case: Option<Case>, column_case: Case) -> Self {
        let inflection = EnglishInflectionService;
        Self {
            ignore: Box::new(|_, _| false),
            is_identifier: Box::new(is_conventional_identifier),
            allow_insert: Box::new(|_, _| true),
            allow_update: Box::new(|_, _| true),
            resolve_table_name: Box::new(move |descriptor| {
                let plural = inflection.to_plural(descriptor.type_name);
                match table_case {
                    Some(case) => plural.to_case(case),
                    None => plural,
                }
            }),
            resolve_table_schema: Box::new(|_| None),
            resolve_column_name: Box::new(move |property| property.name.to_case(column_case)),
            resolve_identifier_column_name: Box::new(move |_, property| {
                property.name.to_case(column_case)
            }),
            resolve_identifier_strategy: Box::new(|_| IdentifierStrategy::DbGenerated),
            resolve_sequence_name: Box::new(|_, _| None),
            resolve_db_type: Box::new(|property| DbType::from(&property.value)),
        }
    }

    setter!(
        /// Properties for which `f` is true are not mapped.
        with_ignore, ignore, (&TypeDescriptor, &PropertyDescriptor) -> bool
    );
    setter!(with_is_identifier, is_identifier, (&TypeDescriptor, &PropertyDescriptor) -> bool);
    setter!(with_allow_insert, allow_insert, (&TypeDescriptor, &PropertyDescriptor) -> bool);
    setter!(with_allow_update, allow_update, (&TypeDescriptor, &PropertyDescriptor) -> bool);
    setter!(with_table_name, resolve_table_name, (&TypeDescriptor) -> String);
    setter!(with_table_schema, resolve_table_schema, (&TypeDescriptor) -> Option<String>);
    setter!(with_column_name, resolve_column_name, (&PropertyDescriptor) -> String);
    setter!(
        with_identifier_column_name,
        resolve_identifier_column_name,
        (&TypeDescriptor, &PropertyDescriptor) -> String
    );
    setter!(
        with_identifier_strategy,
        resolve_identifier_strategy,
        (&TypeDescriptor) -> IdentifierStrategy
    );
    setter!(
        /// Used for the identifier column when the strategy is a sequence.
        with_sequence_name,
        resolve_sequence_name,
        (&TypeDescriptor, &PropertyDescriptor) -> Option<String>
    );
    setter!(with_db_type, resolve_db_type, (&PropertyDescriptor) -> DbType);
}

impl Default for ConventionMappingSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps every property unless ignored, names come from the settings.
///
/// Explicit markers still win: a column marker renames a column or changes
/// its flags, identifier markers replace the name based detection.
#[derive(Default)]
pub struct ConventionMappingConvention {
    settings: ConventionMappingSettings,
}

impl ConventionMappingConvention {
    pub fn new(settings: ConventionMappingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ConventionMappingSettings {
        &self.settings
    }
}

impl MappingConvention for ConventionMappingConvention {
    fn create_table_info(&self, descriptor: &TypeDescriptor) -> Result<TableInfo> {
        check_constructor(descriptor)?;
        let settings = &self.settings;
        let explicit_identifier = descriptor
            .properties
            .iter()
            .any(|p| p.column.as_ref().is_some_and(|c| c.identifier.is_some()));
        let mut identifier_strategy = (settings.resolve_identifier_strategy)(descriptor);
        let columns = descriptor
            .properties
            .iter()
            .filter(|p| !(settings.ignore)(descriptor, *p))
            .map(|property| {
                let attribute = property.column.as_ref();
                let is_identifier = if explicit_identifier {
                    attribute.is_some_and(|c| c.identifier.is_some())
                } else {
                    (settings.is_identifier)(descriptor, property)
                };
                let name = match attribute.and_then(|c| c.name.clone()) {
                    Some(name) => name,
                    None if is_identifier => {
                        (settings.resolve_identifier_column_name)(descriptor, property)
                    }
                    None => (settings.resolve_column_name)(property),
                };
                let db_type = attribute
                    .and_then(|c| c.db_type)
                    .unwrap_or_else(|| (settings.resolve_db_type)(property));
                let mut info = ColumnInfo::new(name, property.name, db_type);
                info.allow_insert = (settings.allow_insert)(descriptor, property)
                    && attribute.is_none_or(|c| c.allow_insert);
                info.allow_update = (settings.allow_update)(descriptor, property)
                    && attribute.is_none_or(|c| c.allow_update);
                info.is_version = attribute.is_some_and(|c| c.version);
                if is_identifier {
                    info.is_identifier = true;
                    if let Some(strategy) = attribute.and_then(|c| c.identifier) {
                        identifier_strategy = strategy;
                    }
                    info.sequence_name = attribute
                        .and_then(|c| c.sequence.clone())
                        .or_else(|| (settings.resolve_sequence_name)(descriptor, property));
                }
                info
            })
            .collect();
        let table = descriptor.table.as_ref();
        let name = table.map_or_else(|| (settings.resolve_table_name)(descriptor), |t| t.name.clone());
        let schema = table
            .and_then(|t| t.schema.clone())
            .or_else(|| (settings.resolve_table_schema)(descriptor));
        TableInfo::new(name, schema, columns, identifier_strategy)
    }
}

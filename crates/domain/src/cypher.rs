//! Cypher DDL synthesis for index descriptors.
//!
//! Every identifier is backtick-quoted so labels and properties with spaces,
//! dashes or reserved words survive the round trip. Only the first label of a
//! descriptor is used; multi-label descriptors are created against their first
//! label, matching how the engine reports single-token indexes.

use crate::descriptor::{EntityType, IndexDescriptor, IndexKind};
use crate::version::{ConstraintSyntax, VersionProfile};

/// Variable bound to the indexed entity in every generated pattern.
const VAR: &str = "n";

/// Quote a Cypher identifier, doubling embedded backticks.
pub fn quote_identifier(identifier: &str) -> String {
    format!("`{}`", identifier.replace('`', "``"))
}

/// Quote a Cypher string literal.
pub fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn entity_pattern(descriptor: &IndexDescriptor) -> String {
    let token = quote_identifier(descriptor.first_label().unwrap_or_default());
    match descriptor.entity_type {
        EntityType::Node => format!("({VAR}:{token})"),
        EntityType::Relationship => format!("()-[{VAR}:{token}]-()"),
    }
}

fn qualified_property(property: &str) -> String {
    format!("{VAR}.{}", quote_identifier(property))
}

/// `CREATE INDEX` or `CREATE CONSTRAINT` text for `descriptor` under `profile`.
pub fn create_statement(profile: VersionProfile, descriptor: &IndexDescriptor) -> String {
    match descriptor.kind() {
        IndexKind::PlainIndex => create_index_statement(descriptor),
        IndexKind::UniquenessConstraint => create_constraint_statement(profile, descriptor),
    }
}

fn create_index_statement(descriptor: &IndexDescriptor) -> String {
    let properties = descriptor
        .properties
        .iter()
        .map(|p| qualified_property(p))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE INDEX {} IF NOT EXISTS FOR {} ON ({}) OPTIONS {{ indexProvider: {} }}",
        quote_identifier(&descriptor.name),
        entity_pattern(descriptor),
        properties,
        quote_string(&descriptor.index_provider)
    )
}

fn create_constraint_statement(profile: VersionProfile, descriptor: &IndexDescriptor) -> String {
    let name = quote_identifier(&descriptor.name);
    let pattern = entity_pattern(descriptor);
    let property = qualified_property(descriptor.first_property().unwrap_or_default());
    match profile.constraint_syntax() {
        ConstraintSyntax::Assert => format!(
            "CREATE CONSTRAINT {name} IF NOT EXISTS ON {pattern} ASSERT {property} IS UNIQUE"
        ),
        ConstraintSyntax::Require => format!(
            "CREATE CONSTRAINT {name} IF NOT EXISTS FOR {pattern} REQUIRE {property} IS UNIQUE"
        ),
    }
}

/// `DROP INDEX` or `DROP CONSTRAINT` text for `descriptor`.
pub fn drop_statement(descriptor: &IndexDescriptor) -> String {
    format!(
        "DROP {} {} IF EXISTS",
        descriptor.kind().keyword(),
        quote_identifier(&descriptor.name)
    )
}

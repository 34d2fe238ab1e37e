//! Dictionary preview handlers

use crate::dictionary::ResolvedName;
use crate::services::CatalogService;

fn print_resolutions(results: &[ResolvedName], unresolved_note: &str) {
    if results.is_empty() {
        println!("Nothing to resolve.");
        return;
    }
    for result in results {
        if result.is_canonical() {
            println!("✓ {}", result.value());
        } else {
            println!("? {} ({unresolved_note})", result.value());
        }
    }
}

pub fn cmd_resolve_studios(service: &dyn CatalogService, input: &str) {
    print_resolutions(
        &service.resolve_studios(input),
        "not in dictionary; stored as \"Other: …\"",
    );
}

pub fn cmd_resolve_roles(service: &dyn CatalogService, input: &str) {
    print_resolutions(
        &service.resolve_roles(input),
        "not in dictionary; stored as typed",
    );
}

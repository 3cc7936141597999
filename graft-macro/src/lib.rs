mod field_attribute;
mod graft_path_attribute;
mod item_struct_gen;

use graft_core::AggregateKind;
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

fn derive(input: TokenStream, kind: AggregateKind) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    item_struct_gen::generate(input, kind)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Injectable` and `Aggregate` for a component.
#[proc_macro_derive(Component, attributes(di))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    derive(input, AggregateKind::Named)
}

/// Derive `Injectable` and `Aggregate` for a parameter bag.
#[proc_macro_derive(Params, attributes(di))]
pub fn derive_params(input: TokenStream) -> TokenStream {
    derive(input, AggregateKind::Anonymous)
}

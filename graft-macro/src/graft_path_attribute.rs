use syn::{parse_quote, Attribute, Path};

// #[di(graft_path = path::to::graft)]
pub(crate) fn graft_path(attrs: &[Attribute]) -> syn::Result<Path> {
    let mut graft_path = None;
    let mut errors = Vec::new();

    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("di"))
        .for_each(|attr| {
            if let Err(err) = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("graft_path") {
                    if graft_path.is_some() {
                        return Err(meta.error("duplicate `graft_path` argument"));
                    }
                    let path = meta.value()?.call(Path::parse_mod_style)?;
                    graft_path = Some(path);
                    Ok(())
                } else {
                    Err(meta.error("the argument must be `graft_path`"))
                }
            }) {
                errors.push(err);
            }
        });

    if let Some(e) = errors.into_iter().reduce(|mut a, b| {
        a.combine(b);
        a
    }) {
        return Err(e);
    }

    Ok(graft_path.unwrap_or_else(|| parse_quote!(::graft)))
}

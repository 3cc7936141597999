use syn::{spanned::Spanned, Attribute, LitStr};

// #[di(qualifier = "..")]

pub(crate) struct FieldAttribute {
    pub(crate) qualifier: Option<LitStr>,
}

impl TryFrom<&Attribute> for FieldAttribute {
    type Error = syn::Error;

    fn try_from(attr: &Attribute) -> Result<Self, Self::Error> {
        let mut qualifier: Option<LitStr> = None;

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("qualifier") {
                if qualifier.is_some() {
                    return Err(meta.error("the `qualifier` attribute can only be set once"));
                }

                let lit = meta.value()?.parse::<LitStr>()?;

                if lit.value().is_empty() {
                    return Err(syn::Error::new(lit.span(), "the qualifier cannot be empty"));
                }

                qualifier = Some(lit);
                return Ok(());
            }

            Err(meta.error("the attribute must be `qualifier`"))
        })?;

        Ok(FieldAttribute { qualifier })
    }
}

impl FieldAttribute {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttribute> {
        let mut field_attr = FieldAttribute { qualifier: None };
        let mut errors = Vec::new();
        let mut already_appeared_di = false;

        attrs
            .iter()
            .filter(|attr| attr.path().is_ident("di"))
            .for_each(|attr| {
                if already_appeared_di {
                    let err =
                        syn::Error::new(attr.span(), "only one `#[di(..)]` attribute is allowed");
                    errors.push(err);
                } else {
                    match FieldAttribute::try_from(attr) {
                        Ok(o) => field_attr = o,
                        Err(e) => errors.push(e),
                    }
                }

                already_appeared_di = true;
            });

        if let Some(e) = errors.into_iter().reduce(|mut a, b| {
            a.combine(b);
            a
        }) {
            return Err(e);
        }

        Ok(field_attr)
    }
}

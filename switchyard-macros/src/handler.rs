//! The `#[handler]` attribute macro.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    FnArg, Ident, ItemFn, LitInt, LitStr, Token,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[handler]` macro.
pub(crate) struct HandlerArgs {
    pub kind: Option<LitStr>,
    pub spec: Option<LitStr>,
    pub name: Option<LitStr>,
    pub priority: Option<i32>,
    pub timeout_ms: Option<u64>,
}

impl Parse for HandlerArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = HandlerArgs {
            kind: None,
            spec: None,
            name: None,
            priority: None,
            timeout_ms: None,
        };

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "kind" => {
                    let lit: LitStr = input.parse()?;
                    if let Err(reason) = validate_kind(&lit.value()) {
                        return Err(syn::Error::new(lit.span(), reason));
                    }
                    args.kind = Some(lit);
                }
                "spec" => args.spec = Some(input.parse()?),
                "name" => args.name = Some(input.parse()?),
                "priority" => {
                    let negative = input.parse::<Option<Token![-]>>()?.is_some();
                    let lit: LitInt = input.parse()?;
                    let value: i32 = lit.base10_parse()?;
                    args.priority = Some(if negative { -value } else { value });
                }
                "timeout_ms" => {
                    let lit: LitInt = input.parse()?;
                    args.timeout_ms = Some(lit.base10_parse()?);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {other}"),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

fn validate_kind(tag: &str) -> Result<(), &'static str> {
    if tag.is_empty() {
        return Err("kind tag must not be empty");
    }
    let valid = tag
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'-' | b'_' | b'.'));
    if !valid {
        return Err("kind tag may only contain lowercase ASCII letters, digits, '-', '_' and '.'");
    }
    Ok(())
}

/// Implementation of the `#[handler]` macro.
pub fn handler_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as HandlerArgs);
    let input = parse_macro_input!(item as ItemFn);
    expand(&args, &input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(args: &HandlerArgs, input: &ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;
    let fn_block = &input.block;
    let fn_attrs = &input.attrs;

    if input.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            input.sig.fn_token,
            "Handler function must be async",
        ));
    }

    let (Some(kind), Some(spec)) = (&args.kind, &args.spec) else {
        return Err(syn::Error::new_spanned(
            &input.sig.ident,
            "#[handler] requires `kind = \"...\"` and `spec = \"...\"`",
        ));
    };

    let inputs = &input.sig.inputs;
    let invocation_pat = match (inputs.first(), inputs.len()) {
        (Some(FnArg::Typed(pat_type)), 1) => &pat_type.pat,
        _ => {
            return Err(syn::Error::new_spanned(
                inputs,
                "Handler function must take exactly one argument: fn(inv: Invocation)",
            ));
        }
    };

    let name = match &args.name {
        Some(lit) => quote! { #lit },
        None => {
            let default = LitStr::new(&fn_name.to_string(), fn_name.span());
            quote! { #default }
        }
    };
    let priority = args.priority.unwrap_or(0);
    let timeout = args.timeout_ms.map(|ms| {
        quote! { .with_timeout(::core::time::Duration::from_millis(#ms)) }
    });

    let expanded = quote! {
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #[doc = concat!("Auto-generated Handler from `#[switchyard::handler]` on `", stringify!(#fn_name), "`")]
        #(#fn_attrs)*
        #fn_vis struct #fn_name;

        impl #fn_name {
            /// The registered handler name.
            pub const NAME: &'static str = #name;
            /// The event kind tag.
            pub const KIND: &'static str = #kind;
            /// The match spec.
            pub const SPEC: &'static str = #spec;
            /// Dispatch priority. Lower values run first.
            pub const PRIORITY: i32 = #priority;

            /// The event kind this handler binds to.
            pub fn kind() -> ::switchyard::Kind {
                ::switchyard::Kind::from_static(Self::KIND)
            }

            /// A route carrying this handler and its registration metadata.
            pub fn route() -> ::switchyard::Route {
                ::switchyard::Route::new(Self::NAME, Self::SPEC, Self)
                    .with_priority(Self::PRIORITY)
                    #timeout
            }
        }

        impl ::switchyard::Handler for #fn_name {
            async fn call(
                &self,
                __invocation: ::switchyard::Invocation,
            ) -> ::switchyard::HandlerResult {
                let #invocation_pat = __invocation;
                #fn_block
            }
        }
    };

    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{Item, parse_quote};

    fn expand_struct(input: ItemFn) -> syn::ItemStruct {
        let args: HandlerArgs = parse_quote!(kind = "http", spec = "GET /users/{id}");
        let file: syn::File = syn::parse2(expand(&args, &input).unwrap()).unwrap();
        file.items
            .into_iter()
            .find_map(|item| match item {
                Item::Struct(item) => Some(item),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn function_attributes_carry_over_to_struct() {
        let generated = expand_struct(parse_quote! {
            /// Looks up one user.
            #[allow(clippy::unused_async)]
            async fn get_user(inv: Invocation) -> HandlerResult {
                Ok(Reply::ok(""))
            }
        });

        let docs: Vec<String> = generated
            .attrs
            .iter()
            .filter(|attr| attr.path().is_ident("doc"))
            .map(|attr| quote!(#attr).to_string())
            .collect();
        assert!(docs.iter().any(|doc| doc.contains("Looks up one user.")));
        let allows_unused_async = generated.attrs.iter().any(|attr| {
            attr.path().is_ident("allow") && quote!(#attr).to_string().contains("unused_async")
        });
        assert!(allows_unused_async);
    }

    #[test]
    fn rejects_sync_functions() {
        let args: HandlerArgs = parse_quote!(kind = "http", spec = "GET /");
        let input: ItemFn = parse_quote! {
            fn sync_handler(inv: Invocation) -> HandlerResult {
                Ok(Reply::ok(""))
            }
        };
        let err = expand(&args, &input).unwrap_err();
        assert!(err.to_string().contains("must be async"));
    }
}

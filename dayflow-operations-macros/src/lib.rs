//! Procedural macros for defining operations
//!
//! `#[operation]` attaches verb, noun and description to a command struct by
//! implementing `dayflow_operations::Operation` for it. The joined
//! `"{verb} {noun}"` string is what activity logs record and what lock
//! exemption lists match, so both words are checked at compile time.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    DeriveInput, Expr, ExprLit, Lit, LitStr, MetaNameValue, Token,
};

/// Attribute macro for defining an operation
///
/// # Usage
///
/// ```ignore
/// #[operation(verb = "move", noun = "card", description = "Move a card to another container")]
/// #[derive(Debug, Deserialize)]
/// pub struct MoveCard {
///     pub card_id: CardId,
///     pub column_id: Option<ColumnId>,
///     pub position: i64,
/// }
/// ```
///
/// Verb and noun must be lowercase words; a noun may contain spaces
/// ("roadmap node").
#[proc_macro_attribute]
pub fn operation(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as OperationArgs);
    let input = parse_macro_input!(item as DeriveInput);

    if !matches!(input.data, syn::Data::Struct(_)) {
        return syn::Error::new_spanned(
            &input.ident,
            "#[operation] can only be applied to structs",
        )
        .to_compile_error()
            .into();
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let OperationArgs {
        verb,
        noun,
        description,
    } = args;

    quote! {
        #input

        impl #impl_generics dayflow_operations::Operation for #name #ty_generics #where_clause {
            fn verb(&self) -> &'static str {
                #verb
            }

            fn noun(&self) -> &'static str {
                #noun
            }

            fn description(&self) -> &'static str {
                #description
            }
        }
    }
    .into()
}

/// Parsed `verb = "..", noun = "..", description = ".."`
struct OperationArgs {
    verb: LitStr,
    noun: LitStr,
    description: LitStr,
}

fn string_value(pair: &MetaNameValue) -> syn::Result<LitStr> {
    match &pair.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Ok(value.clone()),
        other => Err(syn::Error::new_spanned(other, "expected a string literal")),
    }
}

/// Lowercase ASCII words separated by single spaces
fn check_words(field: &str, value: &LitStr) -> syn::Result<()> {
    let text = value.value();
    let valid = !text.is_empty()
        && text
            .split(' ')
            .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase()));
    if valid {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            value,
            format!("{field} must be lowercase words separated by single spaces"),
        ))
    }
}

impl Parse for OperationArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated(input)?;

        let (mut verb, mut noun, mut description) = (None, None, None);
        for pair in &pairs {
            let slot = if pair.path.is_ident("verb") {
                &mut verb
            } else if pair.path.is_ident("noun") {
                &mut noun
            } else if pair.path.is_ident("description") {
                &mut description
            } else {
                return Err(syn::Error::new_spanned(
                    &pair.path,
                    "expected `verb`, `noun` or `description`",
                ));
            };
            if slot.is_some() {
                return Err(syn::Error::new_spanned(&pair.path, "given more than once"));
            }
            *slot = Some(string_value(pair)?);
        }

        let verb = verb.ok_or_else(|| input.error("missing `verb`"))?;
        let noun = noun.ok_or_else(|| input.error("missing `noun`"))?;
        let description = description.ok_or_else(|| input.error("missing `description`"))?;
        check_words("verb", &verb)?;
        check_words("noun", &noun)?;

        Ok(Self {
            verb,
            noun,
            description,
        })
    }
}

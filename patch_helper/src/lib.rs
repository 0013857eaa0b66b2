use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Error, punctuated::Punctuated, spanned::Spanned, token::Comma, DeriveInput, Field,
};

const ATTRIBUTES: [&str; 2] = ["patch_attrs", "no_patch"];

type Result<T> = std::result::Result<T, Error>;

fn has_attr<I: ?Sized>(attrs: &[syn::Attribute], i: &I) -> bool
where
    syn::Ident: PartialEq<I>,
{
    attrs.iter().any(|f| f.path.is_ident(i))
}

/// Derives a `{Name}Patch` companion struct mirroring every field not
/// marked `#[no_patch]`, wrapped in `Option`.
///
/// The patch side gets `new()`, chainable `with_*` setters and
/// `update(self, &mut Name)`; the model side gets `patch()` and
/// `update(&mut self, patch)`. Fields absent from the patch are left
/// untouched. Extra attributes for the generated struct (derives,
/// serde config) are passed through `#[patch_attrs(...)]`.
#[proc_macro_derive(Patch, attributes(patch_attrs, no_patch))]
pub fn patch_derive(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).unwrap();

    match apply_patch(ast) {
        Ok(x) => x,
        Err(e) => e.into_compile_error().into(),
    }
}

fn get_fields(ast: &DeriveInput) -> Result<Vec<Field>> {
    use syn::*;
    match &ast.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(FieldsNamed { named, .. }),
            ..
        }) => Ok(named.iter().cloned().collect()),
        _ => Err(Error::new(
            ast.span(),
            "Only structs with named fields allowed",
        )),
    }
}

fn set_fields(ast: &mut DeriveInput, fields: Vec<Field>) -> Result<()> {
    use syn::*;
    let fields: Punctuated<Field, Comma> = fields.into_iter().collect();
    match &mut ast.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(FieldsNamed { ref mut named, .. }),
            ..
        }) => *named = fields,
        _ => {
            return Err(Error::new(
                ast.span(),
                "Only structs with named fields allowed",
            ))
        }
    }

    Ok(())
}

fn none_field(f: Field) -> TokenStream2 {
    let ident = &f.ident;
    quote! {
       #ident: None,
    }
}

fn apply_f<F>(fields: &[Field], f: F) -> TokenStream2
where
    F: Fn(Field) -> TokenStream2,
{
    fields.iter().cloned().map(f).collect()
}

fn new_patch(fields: &[Field]) -> TokenStream2 {
    let none_fields = apply_f(fields, none_field);
    quote! {
    pub fn new() -> Self {
      Self {
        #none_fields
      }
    }}
}

fn update_function(
    fields: &[Field],
    indent: &syn::Ident,
    generics: &syn::Generics,
) -> TokenStream2 {
    let update_f = apply_f(fields, |f| {
        let f_ident = &f.ident.unwrap();
        quote! {
          if let Some(x) = self.#f_ident {
            this.#f_ident = x;
          }
        }
    });
    quote! {
        pub fn update(self, this: &mut #indent #generics) {
            #update_f
        }
    }
}

fn update_function_rev(
    fields: &[Field],
    indent: &syn::Ident,
    generics: &syn::Generics,
) -> TokenStream2 {
    let update_f = apply_f(fields, |f| {
        let f_ident = &f.ident.unwrap();
        quote! {
          if let Some(x) = this.#f_ident {
            self.#f_ident = x;
          }
        }
    });
    quote! {
        pub fn update(&mut self, this: #indent #generics) {
            #update_f
        }
    }
}

fn patch_f(inp: &DeriveInput, patch_ident: &syn::Ident) -> Result<TokenStream2> {
    let fields: Vec<_> = get_fields(inp)?
        .into_iter()
        .filter(|f| !has_attr(&f.attrs, "no_patch"))
        .collect();
    let constructor = new_patch(&fields);

    let update_f = update_function(&fields, &inp.ident, &inp.generics);
    let update_f_rev = update_function_rev(&fields, patch_ident, &inp.generics);

    let indent = &inp.ident;
    let generics = &inp.generics;

    Ok(quote! {
      impl #generics #patch_ident #generics {
          #constructor
          #update_f
      }

      impl #generics #indent #generics {
          pub fn patch() -> #patch_ident #generics {
            #patch_ident::new()
          }

          #update_f_rev
      }
    })
}

fn wrap_option(mut f: Field) -> Result<Field> {
    let ty = &f.ty;
    let quoted = quote! { ::std::option::Option<#ty> };
    f.ty = syn::parse(quoted.into())?;
    Ok(f)
}

fn is_not_our_attribute(attr: &syn::Attribute) -> bool {
    let f = |s| attr.path.is_ident(s);
    !ATTRIBUTES.iter().any(f)
}
fn clean_attrs(attrs: &mut Vec<syn::Attribute>) {
    attrs.retain(is_not_our_attribute);
}

fn with_field(f: Field) -> TokenStream2 {
    let ty = &f.ty;
    let f_ident = &f.ident;

    let fun_ident = syn::Ident::new(
        &format!("with_{}", f_ident.as_ref().unwrap()),
        f_ident.span(),
    );

    quote! {
       pub fn #fun_ident(mut self, t: #ty) -> Self {
         self.#f_ident = t.into();
         self
       }
    }
}

fn get_inner_attr(attributes: &[syn::Attribute], path: &str) -> Option<TokenStream2> {
    attributes
        .iter()
        .filter(|f| f.path.is_ident(path))
        .flat_map(|x| x.parse_args())
        .next()
}

fn apply_patch(ast: DeriveInput) -> Result<TokenStream> {
    let fields = get_fields(&ast)?;
    let option_fields: Vec<_> = fields
        .iter()
        .filter(|f| !has_attr(&f.attrs, "no_patch"))
        .cloned()
        .flat_map(wrap_option)
        .map(|mut x| {
            clean_attrs(&mut x.attrs);
            x
        })
        .collect();

    let mut new_ast = ast.clone();
    set_fields(&mut new_ast, option_fields)?;

    let inner_attr = get_inner_attr(&new_ast.attrs, "patch_attrs");
    new_ast.attrs = Vec::new();
    new_ast.ident = syn::Ident::new(&format!("{}Patch", ast.ident), ast.ident.span());

    let patch = patch_f(&ast, &new_ast.ident)?;

    let ident = &new_ast.ident;
    let generics = &ast.generics;
    let field_impls = {
        let nfs: Vec<_> = fields
            .iter()
            .filter(|f| !has_attr(&f.attrs, "no_patch"))
            .cloned()
            .collect();
        apply_f(&nfs, with_field)
    };

    let quoted = quote! {
        #inner_attr
        #new_ast
        #patch

     impl #generics #ident #generics {
         #field_impls
     }
    };

    Ok(quoted.into())
}

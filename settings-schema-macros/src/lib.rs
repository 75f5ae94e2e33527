//! Proc macros for the settings-schema crate.
//!
//! This crate provides the `#[derive(Config)]` and `#[derive(SettingEnum)]`
//! macros.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Fields, LitStr, Path, Type, Visibility, ext::IdentExt,
    parse_macro_input, spanned::Spanned,
};

/// How config keys are derived from field names.
enum KeyStyle {
    CamelCase,
    SnakeCase,
}

/// Options parsed from the struct-level `#[config(...)]` attributes.
struct ConfigOptions {
    log_prefix: Option<LitStr>,
    keys: KeyStyle,
    default_value_types: Vec<(Type, Type)>,
    value_type_providers: Vec<Type>,
    validate: Option<Path>,
    is_setting: Option<Path>,
}

impl ConfigOptions {
    fn from_attrs(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut options = Self {
            log_prefix: None,
            keys: KeyStyle::CamelCase,
            default_value_types: Vec::new(),
            value_type_providers: Vec::new(),
            validate: None,
            is_setting: None,
        };

        for attr in attrs {
            if !attr.path().is_ident("config") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("log_prefix") {
                    options.log_prefix = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("keys") {
                    let style: LitStr = meta.value()?.parse()?;
                    options.keys = match style.value().as_str() {
                        "camelCase" | "camel_case" => KeyStyle::CamelCase,
                        "snake_case" => KeyStyle::SnakeCase,
                        other => {
                            return Err(syn::Error::new(
                                style.span(),
                                format!("unknown key style: {other}"),
                            ));
                        }
                    };
                } else if meta.path.is_ident("default_value_type") {
                    let mut field = None;
                    let mut value_type = None;
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("field") {
                            field = Some(inner.value()?.parse::<Type>()?);
                        } else if inner.path.is_ident("value_type") {
                            value_type = Some(inner.value()?.parse::<Type>()?);
                        } else {
                            return Err(inner.error("expected `field` or `value_type`"));
                        }
                        Ok(())
                    })?;
                    match (field, value_type) {
                        (Some(field), Some(value_type)) => {
                            options.default_value_types.push((field, value_type));
                        }
                        _ => {
                            return Err(meta.error(
                                "default_value_type requires both `field` and `value_type`",
                            ));
                        }
                    }
                } else if meta.path.is_ident("value_type_provider") {
                    options
                        .value_type_providers
                        .push(meta.value()?.parse::<Type>()?);
                } else if meta.path.is_ident("validate") {
                    options.validate = Some(meta.value()?.parse::<Path>()?);
                } else if meta.path.is_ident("is_setting") {
                    options.is_setting = Some(meta.value()?.parse::<Path>()?);
                } else {
                    return Err(syn::Error::new(
                        meta.path.span(),
                        format!("unknown config attribute: {:?}", meta.path.get_ident()),
                    ));
                }
                Ok(())
            })?;
        }

        Ok(options)
    }
}

/// Options parsed from a field's `#[config(...)]` attributes.
#[derive(Default)]
struct FieldOptions {
    skip: bool,
    parent: bool,
    colored: bool,
    uncolored: bool,
    key: Option<LitStr>,
    value_type: Option<Type>,
}

impl FieldOptions {
    fn from_field(field: &syn::Field) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in &field.attrs {
            if !attr.path().is_ident("config") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    options.skip = true;
                } else if meta.path.is_ident("parent") {
                    options.parent = true;
                } else if meta.path.is_ident("colored") {
                    options.colored = true;
                } else if meta.path.is_ident("uncolored") {
                    options.uncolored = true;
                } else if meta.path.is_ident("key") {
                    options.key = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("value_type") {
                    options.value_type = Some(meta.value()?.parse()?);
                } else {
                    return Err(syn::Error::new(
                        meta.path.span(),
                        format!("unknown config attribute: {:?}", meta.path.get_ident()),
                    ));
                }
                Ok(())
            })?;
        }

        let modifies_setting = options.colored
            || options.uncolored
            || options.key.is_some()
            || options.value_type.is_some();
        if options.parent && (options.skip || modifies_setting) {
            return Err(syn::Error::new(
                field.span(),
                "`parent` cannot be combined with other config attributes",
            ));
        }
        Ok(options)
    }
}

/// Derive macro for the `Config` trait.
///
/// Every named field is declared as a setting, in declaration order; fields
/// marked `#[config(parent)]` compose the settings of another `Config` struct
/// after them. By default only `pub` fields are settings.
///
/// # Example
///
/// ```rust,ignore
/// use settings_schema::Config;
///
/// #[derive(Debug, Config)]
/// #[config(keys = "snake_case", log_prefix = "Shop config: ")]
/// pub struct ShopSettings {
///     pub max_pages: i32,
///     #[config(colored)]
///     pub shop_name: String,
///     #[config(key = "debug-mode")]
///     pub debug: bool,
///     #[config(skip)]
///     pub loaded: bool,
/// }
/// ```
///
/// This expands to roughly:
///
/// ```rust,ignore
/// impl settings_schema::Config for ShopSettings {
///     const LOG_PREFIX: &'static str = "Shop config: ";
///
///     fn declare(builder: &mut settings_schema::SchemaBuilder<Self>) {
///         {
///             fn get(config: &ShopSettings) -> &i32 { &config.max_pages }
///             fn get_mut(config: &mut ShopSettings) -> &mut i32 { &mut config.max_pages }
///             let info = settings_schema::FieldInfo::new("max_pages", true);
///             builder.field::<i32>(info, get, get_mut);
///         }
///         // ...
///     }
///
///     fn config_key(field: &settings_schema::FieldInfo) -> String {
///         settings_schema::key::snake_case_to_config_key(field.name())
///     }
/// }
/// ```
#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_config_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_config_impl(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Config cannot be derived for generic structs",
        ));
    }
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new(
            input.ident.span(),
            "Config can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new(
            data.fields.span(),
            "Config can only be derived for structs with named fields",
        ));
    };

    let options = ConfigOptions::from_attrs(&input.attrs)?;
    let name = &input.ident;

    let mut declarations = Vec::new();
    for field in &fields.named {
        let field_options = FieldOptions::from_field(field)?;
        if field_options.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let accessors = quote! {
            fn get(config: &#name) -> &#ty {
                &config.#ident
            }
            fn get_mut(config: &mut #name) -> &mut #ty {
                &mut config.#ident
            }
        };

        if field_options.parent {
            declarations.push(quote! {
                {
                    #accessors
                    builder.parent::<#ty>(get, get_mut);
                }
            });
            continue;
        }

        let field_name = ident.unraw().to_string();
        let public = matches!(field.vis, Visibility::Public(_));
        let mut modifiers = Vec::new();
        if let Some(key) = &field_options.key {
            modifiers.push(quote! { .key(#key) });
        }
        if field_options.colored {
            modifiers.push(quote! { .colored() });
        }
        if field_options.uncolored {
            modifiers.push(quote! { .uncolored() });
        }
        if let Some(value_type) = &field_options.value_type {
            modifiers.push(quote! { .value_type::<#value_type>() });
        }

        declarations.push(quote! {
            {
                #accessors
                let info = ::settings_schema::FieldInfo::new(#field_name, #public);
                builder.field::<#ty>(info, get, get_mut) #(#modifiers)*;
            }
        });
    }

    let registrations = options
        .default_value_types
        .iter()
        .map(|(field, value_type)| {
            quote! {
                builder.default_value_type::<#field, #value_type>(
                    <#value_type as ::core::default::Default>::default(),
                );
            }
        })
        .chain(options.value_type_providers.iter().map(|provider| {
            quote! {
                builder.value_type_provider(<#provider as ::core::default::Default>::default());
            }
        }));

    let log_prefix = options.log_prefix.as_ref().map(|prefix| {
        quote! { const LOG_PREFIX: &'static str = #prefix; }
    });
    let config_key = match options.keys {
        KeyStyle::CamelCase => None,
        KeyStyle::SnakeCase => Some(quote! {
            fn config_key(field: &::settings_schema::FieldInfo) -> ::std::string::String {
                ::settings_schema::key::snake_case_to_config_key(field.name())
            }
        }),
    };
    let is_setting = options.is_setting.as_ref().map(|path| {
        quote! {
            fn is_setting(field: &::settings_schema::FieldInfo) -> bool {
                #path(field)
            }
        }
    });
    let validate = options.validate.as_ref().map(|path| {
        quote! {
            fn validate_settings(&mut self, report: &mut ::settings_schema::LoadReport) {
                #path(self, report)
            }
        }
    });

    Ok(quote! {
        impl ::settings_schema::Config for #name {
            #log_prefix

            fn declare(builder: &mut ::settings_schema::SchemaBuilder<Self>) {
                #(#registrations)*
                #(#declarations)*
            }

            #config_key
            #is_setting
            #validate
        }
    })
}

/// Derive macro for the `SettingEnum` trait.
///
/// Only enums with unit variants are supported. Each variant is stored by its
/// name in SCREAMING_SNAKE_CASE, unless renamed with
/// `#[setting(name = "...")]`. Also implements `SettingType`, so the enum can
/// be used as a setting field directly or inside a `Vec`.
///
/// # Example
///
/// ```rust,ignore
/// use settings_schema::SettingEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq, SettingEnum)]
/// pub enum Profession {
///     Armorer,
///     FletcherApprentice, // stored as "FLETCHER_APPRENTICE"
///     #[setting(name = "NONE")]
///     Unemployed,
/// }
/// ```
#[proc_macro_derive(SettingEnum, attributes(setting))]
pub fn derive_setting_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_setting_enum_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_setting_enum_impl(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "SettingEnum cannot be derived for generic enums",
        ));
    }
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new(
            input.ident.span(),
            "SettingEnum can only be derived for enums",
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new(
            input.ident.span(),
            "SettingEnum cannot be derived for enums without variants",
        ));
    }

    let name = &input.ident;
    let mut variants = Vec::new();
    let mut names = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "SettingEnum variants cannot have fields",
            ));
        }
        let ident = &variant.ident;
        let stored = match variant_name(&variant.attrs)? {
            Some(stored) => stored,
            None => LitStr::new(&screaming_snake_case(&ident.unraw().to_string()), ident.span()),
        };
        variants.push(ident);
        names.push(stored);
    }

    Ok(quote! {
        impl ::settings_schema::SettingEnum for #name {
            const VARIANTS: &'static [Self] = &[#(Self::#variants),*];

            fn name(&self) -> &'static str {
                match self {
                    #(Self::#variants => #names,)*
                }
            }
        }

        impl ::settings_schema::SettingType for #name {
            fn field_type() -> ::settings_schema::FieldType {
                ::settings_schema::FieldType::enumeration::<Self>()
            }
        }
    })
}

fn variant_name(attrs: &[syn::Attribute]) -> syn::Result<Option<LitStr>> {
    let mut name = None;
    for attr in attrs {
        if !attr.path().is_ident("setting") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(syn::Error::new(
                    meta.path.span(),
                    format!("unknown setting attribute: {:?}", meta.path.get_ident()),
                ))
            }
        })?;
    }
    Ok(name)
}

/// `LightRain` -> `LIGHT_RAIN`, `HTTPServer` -> `HTTP_SERVER`.
fn screaming_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);
    for (index, &c) in chars.iter().enumerate() {
        if index > 0 && c.is_uppercase() {
            let previous = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(|next| next.is_lowercase());
            if previous.is_lowercase()
                || previous.is_ascii_digit()
                || (previous.is_uppercase() && next_is_lower)
            {
                result.push('_');
            }
        }
        result.extend(c.to_uppercase());
    }
    result
}

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Signature, Type};

/// Turn a function into a test with logging enabled and a fresh
/// `crate::VotingService` injected.
///
/// The test may take no arguments, `service: VotingService`, or
/// `service: &VotingService`. With `#[service_test(sample)]` the service is
/// seeded with `crate::sample::seed` before the test runs.
#[proc_macro_attribute]
pub fn service_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Work out how to pass the service, rejecting invalid function signatures.
    let injection = match check_sig(&item_fn.sig) {
        Ok(injection) => injection,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the inner function so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_inner", name);
    item_fn.sig.ident = new_name.clone();

    // Seed the service if requested.
    let with_sample = match parse_macro_input!(args as Option<Ident>) {
        None => false,
        Some(arg) if arg == "sample" => true,
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `sample` or no argument")
                .into_compile_error()
                .into();
        }
    };
    let maybe_seed = with_sample.then(|| {
        quote! {
            crate::sample::seed(&service).unwrap();
        }
    });

    let needs_service = with_sample || !matches!(injection, Injection::Nothing);
    let maybe_service = needs_service.then(|| {
        quote! {
            let service = crate::VotingService::new();
        }
    });
    let call = injection.call(&new_name);

    // Rewrite the test function.
    quote! {
        #[test]
        fn #name() {
            /// The test itself.
            #item_fn

            log4rs_test_utils::test_logging::init_logging_once_for(["voting_system"], None, None);

            #maybe_service
            #maybe_seed

            #call;
        }
    }
    .into()
}

/// How the test function wants the service.
enum Injection {
    Nothing,
    Owned,
    Borrowed,
}

impl Injection {
    fn call(&self, test_fn: &Ident) -> TokenStream2 {
        match self {
            Self::Nothing => quote! { #test_fn() },
            Self::Owned => quote! { #test_fn(service) },
            Self::Borrowed => quote! { #test_fn(&service) },
        }
    }
}

/// Ensure the wrapped test is synchronous and takes at most a `VotingService`.
fn check_sig(sig: &Signature) -> Result<Injection, syn::Error> {
    if let Some(asyncness) = sig.asyncness {
        return Err(syn::Error::new(
            asyncness.span(),
            "Test must not be `async`, the voting service is synchronous",
        ));
    }

    let mut inputs = sig.inputs.iter();
    let Some(input) = inputs.next() else {
        return Ok(Injection::Nothing);
    };
    if let Some(extra) = inputs.next() {
        return Err(syn::Error::new(
            extra.span(),
            "Test cannot accept more than one argument",
        ));
    }

    if let FnArg::Typed(pat_type) = input {
        match &*pat_type.ty {
            Type::Path(type_path) if is_service(type_path) => return Ok(Injection::Owned),
            Type::Reference(reference) if reference.mutability.is_none() => {
                if let Type::Path(type_path) = &*reference.elem {
                    if is_service(type_path) {
                        return Ok(Injection::Borrowed);
                    }
                }
            }
            _ => {}
        }
    }

    Err(syn::Error::new(
        input.span(),
        "Expected `service: VotingService` or `service: &VotingService`",
    ))
}

fn is_service(type_path: &syn::TypePath) -> bool {
    type_path
        .path
        .segments
        .last()
        .map_or(false, |segment| segment.ident == "VotingService")
}

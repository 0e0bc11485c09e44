use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, spanned::Spanned, ItemFn, Stmt};

/// Marks a synchronous test for both native and wasm32 targets.
///
/// Natively the function becomes a plain `#[test]` that first installs a
/// `tracing-subscriber` fmt layer writing through the test harness, so log
/// output from the runtime shows up next to failing assertions.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let mut input = parse_macro_input!(item as ItemFn);

  let raw_args = proc_macro2::TokenStream::from(attr);
  if !raw_args.is_empty() {
    return TokenStream::from(
      syn::Error::new(
        raw_args.span(),
        "rxlite_macro::test takes no arguments. Use #[rxlite_macro::test].",
      )
      .to_compile_error(),
    );
  }

  if let Some(asyncness) = input.sig.asyncness {
    return TokenStream::from(
      syn::Error::new(
        asyncness.span(),
        "rxlite_macro::test only supports sync tests. Drive futures with \
         futures::executor::block_on inside the test body.",
      )
      .to_compile_error(),
    );
  }

  let init_logging: Stmt = parse_quote! {
    #[cfg(not(target_arch = "wasm32"))]
    {
      let _ = ::tracing_subscriber::fmt()
        .with_max_level(::tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
    }
  };
  input.block.stmts.insert(0, init_logging);

  let expanded = quote! {
      #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
      #[cfg_attr(not(target_arch = "wasm32"), test)]
      #input
  };

  TokenStream::from(expanded)
}

//! Sample input files baked into the binary.
//!
//! These are the files shown next to the import command so users can see the
//! expected column set and document shape without leaving the terminal.

use crate::importer::SourceFormat;

/// Generates one constant per sample plus a lookup by format.
macro_rules! embedded_samples {
    ($($format:path => $file:expr => $const_name:ident),* $(,)?) => {
        $(
            pub const $const_name: &str = include_str!(concat!("../../samples/", $file));
        )*

        /// Bundled sample for `format`, if one ships with the binary.
        pub fn sample_for(format: SourceFormat) -> Option<&'static str> {
            match format {
                $( $format => Some($const_name), )*
                #[allow(unreachable_patterns)]
                _ => None,
            }
        }
    };
}

embedded_samples! {
    SourceFormat::Csv => "sample_test_cases.csv" => SAMPLE_CSV,
    SourceFormat::Json => "sample_tool_data.json" => SAMPLE_JSON,
}

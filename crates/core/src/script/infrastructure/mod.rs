pub mod zhconv_normalizer;

pub mod script_normalizer;

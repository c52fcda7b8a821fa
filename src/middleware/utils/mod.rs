pub mod extractor_utils;

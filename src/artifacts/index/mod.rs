pub mod staged_paths;

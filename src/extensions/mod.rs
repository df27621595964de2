pub mod dim_level_ext;

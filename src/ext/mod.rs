mod resolved_path_ext;

pub use resolved_path_ext::ResolvedPathExt;

pub mod http_embedder;
pub mod mock_embedder;

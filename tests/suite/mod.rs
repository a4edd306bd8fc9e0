mod event_stream;
mod http_assets;
mod local_assets;

use vercel_runtime::{run, Body, Error, Request, Response};
use vimeo_videos::{init_tracing, Config, VideoListProxy};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    run(handler).await
}

pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    Ok(VideoListProxy::new(Config::from_env()).handle(req).await)
}

//! Development server: filters assets on request.
//!
//! In debug mode every asset is registered as a route (a dump that writes
//! nothing), so each request runs the filters against the current sources.
//! Anything else is looked up under `output_dir`.

mod lifecycle;
mod path;
mod response;

use crate::{
    asset::Asset,
    config::PipelineConfig,
    core::{is_serving, is_shutdown, register_server, set_serving},
    debug, log,
    pipeline::Pipeline,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Worker threads answering requests.
const POOL_SIZE: usize = 4;

/// Register routes, bind, and answer requests until Ctrl+C.
pub fn serve(mut pipeline: Pipeline, config: &PipelineConfig) -> Result<()> {
    if pipeline.is_debug() {
        pipeline
            .dump(false, &mut |_: &Asset| {})
            .context("Failed to register asset routes")?;
        debug!("serve"; "{} route(s)", pipeline.routes().len());
    }

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));
    set_serving();

    log!(
        "serve";
        "http://{} (debug mode is {})",
        addr,
        if pipeline.is_debug() { "on" } else { "off" }
    );

    run_request_loop(&server, Arc::new(pipeline))
}

fn run_request_loop(server: &Server, pipeline: Arc<Pipeline>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(POOL_SIZE)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let pipeline = Arc::clone(&pipeline);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &pipeline) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, pipeline: &Pipeline) -> Result<()> {
    if is_shutdown() || !is_serving() {
        return response::respond_unavailable(request);
    }
    if !response::is_get_or_head(&request) {
        return response::respond_method_not_allowed(request);
    }

    let route = path::route_path(request.url());
    if let Some(rendered) = pipeline.render(&route) {
        return match rendered {
            Ok((body, content_type)) => {
                debug!("serve"; "{} {}", route, content_type);
                response::respond_content(request, content_type, body)
            }
            Err(e) => {
                log!("error"; "{}: {}", route, e);
                response::respond_error(request, &e)
            }
        };
    }

    if let Some(file) = path::resolve_path(request.url(), pipeline.output_dir()) {
        let content_type = pipeline.mime().content_type(&file);
        return response::respond_file(request, &file, content_type);
    }

    response::respond_not_found(request)
}

//! "Proxy event" version of the greeting Lambda.
//!
//! This executable defines a server that expects to be interacted with
//! according to AWS API Gateway's "proxy event" protocol. This is what gets
//! deployed; the "bare" version is simpler to drive locally.

use lambda_http::{run, service_fn, Body, Error, Request, Response};

use hello_world_lambda::Services;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init().await?;
    let ref_svcs = &svcs;

    run(service_fn(|_req: Request| async move {
        let greeting = ref_svcs.greet().await?;
        let resp: Response<Body> = greeting.into_http_response()?;
        Ok::<_, Error>(resp)
    }))
    .await?;
    Ok(())
}

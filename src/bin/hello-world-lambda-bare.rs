//! "Bare" version of the greeting Lambda.
//!
//! This executable takes the API Gateway proxy request as plain JSON and
//! answers with a `{statusCode, headers, body}` proxy response, without the
//! `lambda_http` machinery. It's handy with local runtime emulators.

use aws_lambda_events::apigw::ApiGatewayProxyRequest;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

use hello_world_lambda::Services;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init().await?;
    let ref_svcs = &svcs;

    run(service_fn(
        |_event: LambdaEvent<ApiGatewayProxyRequest>| async move {
            let greeting = ref_svcs.greet().await?;
            Ok::<_, Error>(greeting.into_proxy_response())
        },
    ))
    .await?;
    Ok(())
}

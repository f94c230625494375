//! The greeting API: look up our public IP and say hello to it.

use aws_lambda_events::{apigw::ApiGatewayProxyResponse, encodings::Body as ProxyBody};
use lambda_http::{
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue},
    Body, Response,
};
use reqwest::StatusCode;
use thiserror::Error;

const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, Error)]
pub enum GreetError {
    #[error("request to the checkip service failed")]
    Transport(#[from] reqwest::Error),

    #[error("checkip service answered with status {0}")]
    UnexpectedStatus(StatusCode),

    #[error("no IP in checkip response")]
    EmptyBody,
}

/// What the handler sends back: an HTTP status and a text body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Greeting {
    pub status_code: u16,
    pub body: String,
}

impl Greeting {
    /// As an API Gateway proxy response, for the `lambda_http` server.
    pub fn into_http_response(self) -> Result<Response<Body>, lambda_http::http::Error> {
        Response::builder()
            .status(self.status_code)
            .header(CONTENT_TYPE, TEXT_PLAIN)
            .body(Body::Text(self.body))
    }

    /// As a raw `{statusCode, headers, body}` proxy response, for the bare
    /// `lambda_runtime` server.
    pub fn into_proxy_response(self) -> ApiGatewayProxyResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));

        ApiGatewayProxyResponse {
            status_code: self.status_code.into(),
            headers,
            body: Some(ProxyBody::Text(self.body)),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct IpGreeter {
    client: reqwest::Client,
    url: String,
}

impl IpGreeter {
    pub fn new<S: Into<String>>(url: S) -> Self {
        IpGreeter::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client<S: Into<String>>(client: reqwest::Client, url: S) -> Self {
        IpGreeter {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// One GET to the checkip service. No timeout of our own: the Lambda
    /// invocation timeout bounds this.
    pub async fn greet(&self) -> Result<Greeting, GreetError> {
        let resp = self.client.get(&self.url).send().await?;

        if resp.status() != StatusCode::OK {
            return Err(GreetError::UnexpectedStatus(resp.status()));
        }

        let ip = resp.text().await?;

        if ip.is_empty() {
            return Err(GreetError::EmptyBody);
        }

        Ok(Greeting {
            status_code: StatusCode::OK.as_u16(),
            body: format!("Hello, {ip}"),
        })
    }
}

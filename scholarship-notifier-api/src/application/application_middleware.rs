use super::ApplicationEnv;
use crate::auth::JwtAuthorizationValidator;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
    validate_request::ValidateRequestHeaderLayer,
};

pub struct ApplicationMiddleware {
    pub auth: ValidateRequestHeaderLayer<JwtAuthorizationValidator>,
    pub body_limit: RequestBodyLimitLayer,
    pub trace: TraceLayer<SharedClassifier<ServerErrorsAsFailures>>,
}

pub fn create_middleware(
    jwt_validator: JwtAuthorizationValidator,
    env: &ApplicationEnv,
) -> ApplicationMiddleware {
    let auth = ValidateRequestHeaderLayer::custom(jwt_validator);

    let body_limit = RequestBodyLimitLayer::new(env.max_http_content_len);

    let trace = TraceLayer::new_for_http();

    ApplicationMiddleware {
        auth,
        body_limit,
        trace,
    }
}

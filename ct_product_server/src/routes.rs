//! Request handler definitions
//!
//! Each route and its handler is defined here. Anything beyond request plumbing belongs in
//! [product_flow](crate::product_flow). Keep this module neat and tidy 🙏

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use serde_json::Value;
use shopify_api::ProductApi;

use crate::{
    config::ShopifyConfig,
    data_objects::ProductResponse,
    errors::ServerError,
    product_flow::{create_product_flow, validate_payload},
};

/// The header carrying the shared secret. Header name lookups are case-insensitive; the secret
/// value comparison is not.
pub const AUTH_HEADER: &str = "x-ct-auth";

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                // Any method other than $method lands on the default service, which answers the
                // spec'd 405 body instead of actix's bare 404.
                let res = actix_web::web::resource($path)
                    .name(stringify!($name))
                    .route(actix_web::web::$method().to($name::< $( [< T $bounds:camel >], )+>))
                    .default_service(actix_web::web::route().to($crate::routes::method_not_allowed));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

pub async fn method_not_allowed() -> Result<HttpResponse, ServerError> {
    trace!("💻️ Rejecting request with unsupported method");
    Err(ServerError::MethodNotAllowed)
}

//----------------------------------------------   Products  ----------------------------------------------------
route!(create_product => post "/products" impl ProductApi);
/// Route handler for the product creation endpoint.
///
/// The gates run strictly in order: shared secret, then server configuration, then payload. Only
/// once all three pass does any call leave for the Admin API. See
/// [`create_product_flow`](crate::product_flow::create_product_flow) for the call sequence itself.
pub async fn create_product<A>(
    req: HttpRequest,
    body: web::Json<Value>,
    config: web::Data<ShopifyConfig>,
    api: web::Data<A>,
) -> Result<HttpResponse, ServerError>
where
    A: ProductApi,
{
    trace!("🛍️ Received product creation request");
    check_shared_secret(&req, config.as_ref())?;
    config.check_required()?;
    let new_product = validate_payload(body.into_inner())?;
    let product = create_product_flow(api.get_ref(), &new_product).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::success(product)))
}

fn check_shared_secret(req: &HttpRequest, config: &ShopifyConfig) -> Result<(), ServerError> {
    if config.shared_secret.is_empty() {
        warn!("🔐️ No shared secret is configured. Denying access.");
        return Err(ServerError::Unauthorized);
    }
    let provided = req.headers().get(AUTH_HEADER).and_then(|v| v.to_str().ok()).ok_or_else(|| {
        debug!("🔐️ No {AUTH_HEADER} header in request. Denying access.");
        ServerError::Unauthorized
    })?;
    if provided != config.shared_secret.reveal() {
        warn!("🔐️ Invalid shared secret in request. Denying access.");
        return Err(ServerError::Unauthorized);
    }
    trace!("🔐️ Shared secret check for request ✅️");
    Ok(())
}

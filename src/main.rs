//! relay-demo: una cadena de ejemplo corriendo sobre el runtime de tokio.
//!
//! Siembra una petición y una identidad, corre guardia → anotación →
//! fetch diferido → render, e imprime el desenlace. El modo de scheduling
//! sale de `RELAY_SYNC_MODE` (ver relay-core::config).

use std::sync::Arc;

use relay_adapters::{
    AnnotateStep, FetchStep, GuardStep, Principal, RenderStep, RequestInfo, Response,
};
use relay_core::model::ctx_value;
use relay_core::{
    Callback, Chain, Invoker, RunError, State, StepRegistry, Terminal, TokioExecutor,
};

struct PrintCallback;

impl Callback<Response> for PrintCallback {
    fn on_rejected(&self, state: &State<Response>) {
        println!("[relay-demo] rechazado por '{}'", state.step().id());
    }

    fn on_done(&self, _state: &State<Response>, results: &[Arc<Response>]) {
        for response in results {
            println!(
                "[relay-demo] respuesta {}: {}",
                response.status.unwrap_or(0),
                response.body
            );
        }
    }

    fn on_no_response(&self) {
        println!("[relay-demo] la cadena se agotó sin respuesta");
    }

    fn on_failure(&self, cause: RunError) {
        eprintln!("[relay-demo] fallo en '{}': {cause}", cause.step_id());
    }
}

#[tokio::main]
async fn main() {
    // .env opcional: RELAY_SYNC_MODE, etc.
    let _ = dotenvy::dotenv();

    let registry = Arc::new(StepRegistry::<Response>::new());
    let mut chain = Chain::new(registry);
    chain.contribute(ctx_value(RequestInfo::get("/records/42")));
    chain.contribute(ctx_value(Principal {
        subject: "demo".to_string(),
        roles: vec!["reader".to_string()],
    }));
    chain.add(GuardStep::new("reader"));
    chain.add(AnnotateStep::new("note", "demo"));
    chain.add(FetchStep::new("42").with_latency(std::time::Duration::from_millis(50)));
    chain.add(RenderStep::new(200));

    let invoker = Invoker::builder()
        .executor(Arc::new(TokioExecutor::current()))
        .build();
    let mut handle = invoker.submit(chain, Arc::new(PrintCallback));

    let terminal = handle.terminal().await;
    println!("[relay-demo] run {} terminó: {terminal:?}", handle.run_id());
    if terminal == Terminal::Done {
        println!("[relay-demo] {} resultado(s) juntado(s)", handle.results().len());
    }
}

//! Suspensión y reanudación: contrato one-shot del resumer, una sola
//! suspensión por run, y la continuación del step que difirió.

mod support;

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use relay_core::model::ctx_value;
use relay_core::{
    Chain, ConfigError, Invoker, Outcome, Phase, Resumer, StepRegistry, SyncMode, Terminal,
};
use support::{Doc, FnStep, Rec};

fn empty_chain() -> Chain<Doc> {
    Chain::new(Arc::new(StepRegistry::<Doc>::new()))
}

type Slot = Arc<Mutex<Option<Resumer<Doc>>>>;

/// Step que difiere y estaciona el resumer en un slot para que el test lo
/// dispare a mano.
fn parking_step(id: &str, slot: Slot) -> FnStep {
    FnStep::new(id, move |cx| {
        let slot = slot.clone();
        cx.defer_with(move |resumer| {
            if let Ok(mut parked) = slot.lock() {
                *parked = Some(resumer);
            }
        })?;
        Ok(Outcome::Continuing(Vec::new()))
    })
}

#[derive(Debug, PartialEq)]
struct Extra(&'static str);

#[test]
fn suspend_resume_round_trip() {
    let slot: Slot = Arc::new(Mutex::new(None));
    let mut chain = empty_chain();
    chain.add(parking_step("espera", slot.clone()));
    chain.add(FnStep::new("lector", |cx| {
        // el contexto extra del resume ya está plegado
        assert_eq!(cx.get::<Extra>().as_deref(), Some(&Extra("llegó")));
        let doc = cx.response();
        doc.complete = true;
        doc.touched = true;
        Ok(Outcome::Finished)
    }));

    let rec = Rec::new();
    let handle = Invoker::inline().submit(chain, rec.clone());

    // suspendido: sin terminal, sin callbacks terminales
    assert_eq!(handle.phase(), Phase::Suspended);
    assert_eq!(handle.terminal_now(), None);
    assert!(rec.terminals().is_empty());

    let resumer = slot.lock().unwrap().take().unwrap();
    resumer.resume(vec![ctx_value(Extra("llegó"))]).unwrap();

    assert_eq!(handle.terminal_now(), Some(Terminal::Done));
    assert_eq!(rec.terminals(), vec!["done:lector:1"]);
}

#[test]
fn resumer_is_one_shot() {
    let slot: Slot = Arc::new(Mutex::new(None));
    let mut chain = empty_chain();
    chain.add(parking_step("espera", slot.clone()));
    chain.add(FnStep::finisher("fin"));

    let handle = Invoker::inline().submit(chain, Rec::new());
    let resumer = slot.lock().unwrap().take().unwrap();

    resumer.resume(Vec::new()).unwrap();
    assert_eq!(handle.terminal_now(), Some(Terminal::Done));

    // el segundo disparo no re-ejecuta nada
    assert!(matches!(resumer.resume(Vec::new()), Err(ConfigError::NotSuspended)));
    assert_eq!(handle.results().len(), 1);
}

#[test]
fn second_defer_in_same_constructor_is_refused() {
    let mut chain = empty_chain();
    chain.add(FnStep::new("doble", |cx| {
        let _first = cx.defer_with(|_resumer| {})?;
        assert!(matches!(cx.defer(), Err(ConfigError::AlreadyDeferred)));
        Ok(Outcome::Continuing(Vec::new()))
    }));
    chain.add(FnStep::finisher("fin"));

    let slotless = Invoker::inline().submit(chain, Rec::new());
    assert_eq!(slotless.phase(), Phase::Suspended);
}

#[test]
fn second_defer_in_same_run_fails_the_run() {
    let slot: Slot = Arc::new(Mutex::new(None));
    let mut chain = empty_chain();
    chain.add(parking_step("primero", slot.clone()));
    chain.add(FnStep::new("segundo", |cx| {
        // la cuota de suspensión del run ya se gastó
        cx.defer()?;
        Ok(Outcome::Continuing(Vec::new()))
    }));
    chain.add(FnStep::finisher("fin"));

    let rec = Rec::new();
    let handle = Invoker::inline().submit(chain, rec.clone());

    let resumer = slot.lock().unwrap().take().unwrap();
    resumer.resume(Vec::new()).unwrap();

    assert_eq!(handle.terminal_now(), Some(Terminal::Failed));
    assert_eq!(rec.terminals(), vec!["failure:segundo"]);
}

#[test]
fn deferring_finisher_completes_after_resume() {
    let slot: Slot = Arc::new(Mutex::new(None));
    let parked = slot.clone();
    let mut chain = empty_chain();
    chain.add(FnStep::new("fin_diferido", move |cx| {
        let slot = parked.clone();
        cx.defer_with(move |resumer| {
            if let Ok(mut parked) = slot.lock() {
                *parked = Some(resumer);
            }
        })?;
        let doc = cx.response();
        doc.complete = true;
        doc.touched = true;
        Ok(Outcome::Finished)
    }));
    // nunca debería correr
    chain.add(FnStep::appender("sobra", "no"));

    let rec = Rec::new();
    let handle = Invoker::inline().submit(chain, rec.clone());
    assert_eq!(handle.phase(), Phase::Suspended);

    let resumer = slot.lock().unwrap().take().unwrap();
    resumer.resume(Vec::new()).unwrap();

    assert_eq!(handle.terminal_now(), Some(Terminal::Done));
    assert_eq!(rec.terminals(), vec!["done:fin_diferido:1"]);
    assert_eq!(handle.results().len(), 1);
}

#[test]
fn deferred_code_runs_after_constructor_returns() {
    let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let in_step = log.clone();
    let mut chain = empty_chain();
    chain.add(FnStep::new("difiere", move |cx| {
        in_step.lock().unwrap().push("constructor:entra");
        let in_code = in_step.clone();
        cx.defer_with(move |resumer| {
            in_code.lock().unwrap().push("codigo");
            // disparo síncrono: la reanudación sale del propio código
            let _ = resumer.resume(Vec::new());
        })?;
        in_step.lock().unwrap().push("constructor:sale");
        Ok(Outcome::Continuing(Vec::new()))
    }));
    chain.add(FnStep::finisher("fin"));

    let rec = Rec::new();
    let handle = Invoker::inline().submit(chain, rec.clone());

    // el código diferido corrió entre la salida del constructor y el retorno
    // de submit, y el resume inline completó el run
    assert_eq!(handle.terminal_now(), Some(Terminal::Done));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["constructor:entra", "constructor:sale", "codigo"]
    );
    assert_eq!(rec.terminals(), vec!["done:fin:1"]);
}

#[tokio::test]
async fn resume_from_another_thread() {
    let mut chain = empty_chain();
    chain.add(FnStep::new("lento", |cx| {
        cx.defer_with(|resumer| {
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                let _ = resumer.resume(vec![ctx_value(Extra("tarde"))]);
            });
        })?;
        Ok(Outcome::Continuing(Vec::new()))
    }));
    chain.add(FnStep::new("lector", |cx| {
        assert_eq!(cx.get::<Extra>().as_deref(), Some(&Extra("tarde")));
        let doc = cx.response();
        doc.complete = true;
        doc.touched = true;
        Ok(Outcome::Finished)
    }));

    let rec = Rec::new();
    let invoker = Invoker::builder().sync_mode(SyncMode::AllSync).build();
    let mut handle = invoker.submit(chain, rec.clone());

    assert_eq!(handle.terminal().await, Terminal::Done);
    assert_eq!(rec.terminals(), vec!["done:lector:1"]);
}

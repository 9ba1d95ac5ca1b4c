use classified_errors::{ClassifiedError, ErrorCode, ResultExt};
use std::io;

const UPSTREAM: ErrorCode = ErrorCode::define("upstream");

fn call_upstream(request_id: &'static str) -> Result<(), ClassifiedError> {
    Err(io::Error::new(io::ErrorKind::TimedOut, "read timed out"))
        .wrap_err_with_data("upstream call failed", request_id)
        .classify(UPSTREAM, "request failed")
}

fn main() {
    println!("--- Log Record Example ---\n");

    let Err(err) = call_upstream("req-7") else {
        return;
    };

    // Plain-text sinks: one bounded key='value' line
    let mut line = String::new();
    if err.record().write_to(&mut line).is_ok() {
        println!("{line}");
    }

    // Structured sinks: pick fields off the borrowed record
    err.with_record(|record| {
        println!("\ncode      = {}", record.code());
        println!("message   = {}", record.message());
        println!("cause     = {:?}", record.cause_message());
        println!("location  = {}", record.location());
        println!("function  = {}", record.location().function());
        println!("depth     = {}", record.depth());
    });

    // Huge messages are cut before they reach the log line
    let noisy = ClassifiedError::root(UPSTREAM, "x".repeat(5_000));
    let mut line = String::new();
    if noisy.record().write_to(&mut line).is_ok() {
        println!("\ntruncated line is {} bytes", line.len());
    }
}

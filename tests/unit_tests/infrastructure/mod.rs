mod azure_whisper_engine_test;
mod security_test;
mod self_call_dispatcher_test;
mod transcript_sanitizer_test;

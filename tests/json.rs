use std::{
    fs,
    time::{Duration, UNIX_EPOCH},
};

use cucumber_reportportal::{
    event::{PickleStep, StepResult, TestCase},
    Cucumber, Event, JsonLines, Reporter,
};
use tempfile::NamedTempFile;

const FEATURE: &str = "\
Feature: Json
  Scenario: writing
    Given a file
";

#[test]
fn writes_every_call_as_json_line() {
    let file = NamedTempFile::new().unwrap();
    let reporter = Reporter::new(JsonLines::json_lines(file.reopen().unwrap()));

    let case = TestCase::new("json.feature", 2, "writing");
    let step = PickleStep::new("a file", 3);
    for (secs, ev) in (1..).zip([
        Cucumber::Started,
        Cucumber::source_read("json.feature", FEATURE),
        Cucumber::case_started(case.clone()),
        Cucumber::step_started(step.clone()),
        Cucumber::embed("text/plain", *b"hello"),
        Cucumber::step_finished(step, StepResult::failed("no such file")),
        Cucumber::case_finished(case, StepResult::failed("no such file")),
        Cucumber::Finished,
    ]) {
        let at = UNIX_EPOCH + Duration::from_secs(secs);
        reporter.handle_event(Event::new_at(at, ev)).unwrap();
    }
    drop(reporter.into_client().into_output().unwrap());

    let lines = fs::read_to_string(file.path())
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
        .collect::<Vec<_>>();
    let calls = lines
        .iter()
        .map(|l| l["call"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        calls,
        [
            "start_launch",
            "start_item",
            "start_item",
            "start_item",
            "log",
            "log",
            "finish_item",
            "finish_item",
            "finish_item",
            "finish_launch",
        ],
    );

    assert_eq!(lines[0]["rq"]["start_time"], "1970-01-01T00:00:01.000Z");
    assert_eq!(lines[0]["rq"]["mode"], "DEFAULT");
    assert_eq!(lines[3]["rq"]["name"], "Given a file");
    assert_eq!(lines[3]["parent"], lines[2]["id"]);

    assert_eq!(lines[4]["rq"]["attachment"]["content_type"], "text/plain");
    assert_eq!(lines[4]["rq"]["attachment"]["data"], "aGVsbG8=");
    assert_eq!(lines[5]["rq"]["message"], "no such file");
    assert_eq!(lines[5]["rq"]["level"], "ERROR");

    assert_eq!(lines[6]["rq"]["status"], "FAILED");
    assert_eq!(lines[8]["rq"]["status"], serde_json::Value::Null);
    assert_eq!(lines[8]["rq"]["end_time"], "1970-01-01T00:00:07.000Z");
}

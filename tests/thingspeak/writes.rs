use crate::mock::{Event, ManualClock, client, response, settle};
use tsfeed::network::application::thingspeak::config::USER_AGENT;
use tsfeed::network::application::thingspeak::{Config, Operation};
use tsfeed::{Error, Status};

#[test]
fn write_field_posts_one_value() {
    let clock = ManualClock::at(1_000);
    let mut client = client(&clock);

    client.write_field(12345, 1, "23.5", "ABCD").unwrap();
    assert!(client.is_busy());
    assert_eq!(client.in_flight(), Some(Operation::WriteField));
    assert_eq!(client.pending_steps(), 3);

    let expected = format!(
        "POST /update HTTP/1.1\r\n\
         Host: api.thingspeak.com\r\n\
         User-Agent: {}\r\n\
         X-THINGSPEAKAPIKEY: ABCD\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\
         Content-Length: 25\r\n\
         \r\n\
         field1=23.5&headers=false",
        USER_AGENT
    );
    assert_eq!(client.transport().sent_text(), expected);
    assert_eq!(
        client.transport().remote,
        Some(("api.thingspeak.com".to_string(), 80))
    );
    assert_eq!(client.transport().flushes, 1);

    client.transport_mut().deliver(&response("200 OK", "1"));
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Ok);
    assert_eq!(client.handler().events, [Event::WriteField(Status::Ok)]);
    assert_eq!(client.transport().closes, 1);
    assert_eq!(client.transport().unread(), 0);
    assert!(!client.is_busy());
    assert_eq!(client.in_flight(), None);
}

#[test]
fn entry_id_zero_is_not_inserted() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.write_field(12345, 1, "23.5", "ABCD").unwrap();
    client.transport_mut().deliver(&response("200 OK", "0"));
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Failed(Error::NotInserted));
    assert_eq!(client.last_status().code(), -401);
    assert_eq!(
        client.handler().events,
        [Event::WriteField(Status::Failed(Error::NotInserted))]
    );
    assert_eq!(client.transport().closes, 1);
}

#[test]
fn non_numeric_entry_id_is_not_inserted() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.write_raw(1, "field1=5", "KEY").unwrap();
    client.transport_mut().deliver(&response("200 OK", "rate limited"));
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Failed(Error::NotInserted));
}

#[test]
fn server_errors_pass_through() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.write_field(12345, 2, &7i32, "WRONG").unwrap();
    client.transport_mut().deliver(&response("400 Bad Request", "-1"));
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Http(400));
    assert_eq!(client.handler().events, [Event::WriteField(Status::Http(400))]);
    // The error body is drained before the connection is closed.
    assert_eq!(client.transport().unread(), 0);
    assert_eq!(client.transport().closes, 1);
}

#[test]
fn write_fields_sends_everything_queued() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.set_field(1, &21.5f32).unwrap();
    client.set_field(4, &-3i64).unwrap();
    client.set_latitude(51.5);
    client.set_longitude(-0.25);
    client.set_elevation(35.0);
    client.set_status("nominal").unwrap();
    client.set_twitter_tweet("station", "hello").unwrap();
    client.set_created_at("2024-05-01T10:00:00Z").unwrap();

    client.write_fields(12345, "ABCD").unwrap();
    let body = "field1=21.50000&field4=-3&lat=51.50&long=-0.25&elevation=35.00\
                &status=nominal&twitter=station&tweet=hello\
                &created_at=2024-05-01T10:00:00Z&headers=false";
    assert_eq!(client.transport().sent_body(), body);
    assert!(
        client
            .transport()
            .sent_text()
            .contains(&format!("Content-Length: {}\r\n", body.len()))
    );
    assert!(client.pending().is_empty());

    client.transport_mut().deliver(&response("200 OK", "1234"));
    settle(&mut client);
    assert_eq!(client.handler().events, [Event::WriteFields(Status::Ok)]);
}

#[test]
fn write_fields_without_values_never_connects() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.write_fields(12345, "ABCD").unwrap();

    // The callback is deferred to the next poll.
    assert!(client.handler().events.is_empty());
    assert_eq!(client.pending_steps(), 1);
    assert_eq!(settle(&mut client), 1);

    assert_eq!(
        client.handler().events,
        [Event::WriteFields(Status::Failed(Error::FieldsNotSet))]
    );
    assert_eq!(client.last_status().code(), -210);
    assert_eq!(client.transport().connects, 0);
    assert!(client.transport().sent.is_empty());
}

#[test]
fn invalid_arguments_fail_before_any_io() {
    let clock = ManualClock::default();
    let mut client = client(&clock);
    client.set_field(3, "kept").unwrap();

    client.write_field(12345, 0, "1", "ABCD").unwrap();
    settle(&mut client);
    client.write_field(12345, 9, "1", "ABCD").unwrap();
    settle(&mut client);
    let long = "x".repeat(256);
    client.write_field(12345, 1, long.as_str(), "ABCD").unwrap();
    settle(&mut client);
    client.write_field(12345, 1, &1.0e12f64, "ABCD").unwrap();
    settle(&mut client);

    assert_eq!(
        client.handler().events,
        [
            Event::WriteField(Status::Failed(Error::InvalidFieldNumber)),
            Event::WriteField(Status::Failed(Error::InvalidFieldNumber)),
            Event::WriteField(Status::Failed(Error::OutOfRange)),
            Event::WriteField(Status::Failed(Error::OutOfRange)),
        ]
    );
    assert_eq!(client.transport().connects, 0);
    // Rejected writes leave the queue alone.
    assert_eq!(client.pending().field(3), "kept");
}

#[test]
fn connect_failure_still_clears_the_queue() {
    let clock = ManualClock::default();
    let mut client = client(&clock);
    client.transport_mut().refuse_connect = true;
    client.set_field(1, "10").unwrap();

    client.write_fields(12345, "ABCD").unwrap();
    assert!(client.pending().is_empty());
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Failed(Error::ConnectFailed));
    assert_eq!(
        client.handler().events,
        [Event::WriteFields(Status::Failed(Error::ConnectFailed))]
    );
    assert_eq!(client.transport().closes, 0);
}

#[test]
fn partial_write_aborts_and_closes() {
    let clock = ManualClock::default();
    let mut client = client(&clock);
    client.transport_mut().write_budget = Some(20);

    client.write_field(12345, 1, "23.5", "ABCD").unwrap();
    assert_eq!(client.pending_steps(), 1);
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Failed(Error::UnexpectedFailure));
    assert_eq!(client.last_status().code(), -302);
    assert_eq!(client.transport().closes, 1);
    assert_eq!(client.transport().flushes, 0);
}

#[test]
fn flush_failure_aborts_and_closes() {
    let clock = ManualClock::default();
    let mut client = client(&clock);
    client.transport_mut().fail_flush = true;

    client.write_raw(12345, "field2=5", "ABCD").unwrap();
    settle(&mut client);

    assert_eq!(
        client.handler().events,
        [Event::WriteRaw(Status::Failed(Error::UnexpectedFailure))]
    );
    assert_eq!(client.transport().closes, 1);
}

#[test]
fn silent_server_times_out_after_five_seconds() {
    let clock = ManualClock::at(10_000);
    let mut client = client(&clock);

    client.write_field(12345, 1, "23.5", "ABCD").unwrap();

    clock.set(15_000);
    assert!(client.poll());
    assert!(client.is_busy());

    clock.set(15_001);
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Failed(Error::Timeout));
    assert_eq!(client.last_status().code(), -304);
    assert_eq!(
        client.handler().events,
        [Event::WriteField(Status::Failed(Error::Timeout))]
    );
    assert_eq!(client.transport().closes, 1);
}

#[test]
fn body_timeout_restarts_after_headers() {
    let clock = ManualClock::at(0);
    let mut client = client(&clock);

    client.write_field(12345, 1, "23.5", "ABCD").unwrap();
    client
        .transport_mut()
        .deliver(b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\n1");

    clock.set(4_000);
    assert!(client.poll());
    assert_eq!(client.last_status(), Status::Ok);

    clock.set(9_000);
    assert!(client.poll());
    assert!(client.is_busy());

    clock.set(9_001);
    settle(&mut client);
    assert_eq!(client.last_status(), Status::Failed(Error::Timeout));
    assert_eq!(client.transport().closes, 1);
}

#[test]
fn response_may_trickle_in() {
    let clock = ManualClock::default();
    let mut client = client(&clock);
    let reply = response("200 OK", "42");
    let last = reply.len() - 1;

    client.write_field(12345, 1, "1", "ABCD").unwrap();

    client.transport_mut().deliver(&reply[..10]);
    assert!(client.poll());
    assert_eq!(client.pending_steps(), 3);
    assert_eq!(client.transport().unread(), 0);

    client.transport_mut().deliver(&reply[10..last]);
    assert!(client.poll());
    assert!(client.poll());
    assert_eq!(client.pending_steps(), 3);
    assert!(client.handler().events.is_empty());

    client.transport_mut().deliver(&reply[last..]);
    settle(&mut client);

    assert_eq!(client.last_status(), Status::Ok);
    assert_eq!(client.handler().events, [Event::WriteField(Status::Ok)]);
}

#[test]
fn headers_split_across_deliveries_complete() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.write_field(12345, 1, "23.5", "ABCD").unwrap();
    client
        .transport_mut()
        .deliver(b"HTTP/1.1 200 OK\r\nDate: x\r\n");
    assert!(client.poll());
    assert!(client.is_busy());

    clock.advance(10);
    client
        .transport_mut()
        .deliver(b"Content-Length: 1\r\n\r\n7");
    settle(&mut client);

    assert_eq!(client.handler().events, [Event::WriteField(Status::Ok)]);
    assert_eq!(client.transport().closes, 1);
}

#[test]
fn headers_that_stop_arriving_time_out() {
    let clock = ManualClock::at(0);
    let mut client = client(&clock);

    client.write_field(12345, 1, "1", "ABCD").unwrap();
    client
        .transport_mut()
        .deliver(b"HTTP/1.1 200 OK\r\nContent-Le");
    assert!(client.poll());

    clock.set(5_000);
    assert!(client.poll());
    assert!(client.is_busy());

    clock.set(5_001);
    settle(&mut client);
    assert_eq!(client.last_status(), Status::Failed(Error::Timeout));
    assert_eq!(
        client.handler().events,
        [Event::WriteField(Status::Failed(Error::Timeout))]
    );
    assert_eq!(client.transport().closes, 1);
}

#[test]
fn busy_client_refuses_new_operations() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.write_field(12345, 1, "1", "ABCD").unwrap();
    let steps = client.pending_steps();

    assert_eq!(client.write_fields(12345, "ABCD"), Err(Error::Busy));
    assert_eq!(client.read_status(12345, None), Err(Error::Busy));
    assert_eq!(client.read_string_field(12345, 0, None), Err(Error::Busy));
    assert_eq!(client.pending_steps(), steps);
    assert_eq!(client.transport().connects, 1);

    client.transport_mut().deliver(&response("200 OK", "9"));
    settle(&mut client);
    assert_eq!(client.handler().events.len(), 1);
    assert_eq!(client.last_status(), Status::Ok);
}

#[test]
fn status_accessor_is_idempotent() {
    let clock = ManualClock::default();
    let mut client = client(&clock);

    client.write_fields(1, "KEY").unwrap();
    settle(&mut client);

    let first = client.last_status();
    let _ = client.feed().field_as_string(0);
    let _ = client.pending().field(42);
    assert_eq!(client.last_status(), first);
    assert_eq!(client.last_status(), first);
}

#[test]
fn secure_config_changes_the_port() {
    let clock = ManualClock::default();
    let mut client = client(&clock).with_config(Config {
        host: "feeds.example.net",
        ..Config::secure()
    });

    client.write_raw(7, "field1=1", "KEY").unwrap();
    assert_eq!(
        client.transport().remote,
        Some(("feeds.example.net".to_string(), 443))
    );
    assert!(client.transport().sent_text().contains("Host: feeds.example.net\r\n"));
}

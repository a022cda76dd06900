//! Randomised checks over field numbers, value lengths and entry ids.

use crate::mock::{Event, ManualClock, client, response, settle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tsfeed::network::application::thingspeak::json::value_by_key;
use tsfeed::network::application::thingspeak::{FIELD_MAX, FIELD_MIN, FieldBuffer, MAX_VALUE_LEN};
use tsfeed::{Error, Status};

const ROUNDS: usize = 200;

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x7473_6665_6564)
}

#[test]
fn only_fields_one_to_eight_are_accepted() {
    let mut rng = rng();
    let clock = ManualClock::default();
    let mut client = client(&clock);

    for _ in 0..ROUNDS {
        let field: u8 = rng.r#gen();
        let valid = (FIELD_MIN..=FIELD_MAX).contains(&field);

        let mut buffer = FieldBuffer::new();
        assert_eq!(buffer.set_field(field, "1").is_ok(), valid, "field {}", field);

        if !valid {
            client.write_field(1, field, "1", "KEY").unwrap();
            settle(&mut client);
            assert_eq!(
                client.last_status(),
                Status::Failed(Error::InvalidFieldNumber)
            );
        }
    }
    assert_eq!(client.transport().connects, 0);
}

#[test]
fn values_longer_than_255_bytes_are_rejected() {
    let mut rng = rng();

    for _ in 0..ROUNDS {
        let len = rng.gen_range(0..=2 * MAX_VALUE_LEN);
        let value = "v".repeat(len);
        let field = rng.gen_range(FIELD_MIN..=FIELD_MAX);

        let mut buffer = FieldBuffer::new();
        buffer.set_field(field, "before").unwrap();
        let result = buffer.set_field(field, value.as_str());

        if len > MAX_VALUE_LEN {
            assert_eq!(result, Err(Error::OutOfRange));
            assert_eq!(buffer.field(field), "before");
        } else {
            assert_eq!(result, Ok(()));
            assert_eq!(buffer.field(field), value);
        }
    }
}

#[test]
fn any_nonzero_entry_id_is_a_success() {
    let mut rng = rng();
    let clock = ManualClock::default();
    let mut client = client(&clock);

    for _ in 0..ROUNDS / 4 {
        let entry: u32 = rng.gen_range(1..=u32::MAX);
        client.write_field(1, 1, &entry, "KEY").unwrap();
        client
            .transport_mut()
            .deliver(&response("200 OK", &entry.to_string()));
        settle(&mut client);
        assert_eq!(client.last_status(), Status::Ok, "entry {}", entry);
    }
    assert_eq!(client.transport().closes, ROUNDS / 4);
}

#[test]
fn written_fields_come_back_from_a_feed() {
    let mut rng = rng();

    for _ in 0..ROUNDS {
        let mut buffer = FieldBuffer::new();
        let mut json = String::from("{\"entry_id\":1");
        for field in FIELD_MIN..=FIELD_MAX {
            if rng.gen_bool(0.5) {
                let value: u32 = rng.r#gen();
                buffer.set_field(field, &value).unwrap();
                json.push_str(&format!(",\"field{}\":\"{}\"", field, value));
            }
        }
        json.push('}');

        for field in FIELD_MIN..=FIELD_MAX {
            let key = format!("field{}", field);
            assert_eq!(value_by_key(&json, &key), buffer.field(field));
        }
    }
}

#[test]
fn every_operation_reports_exactly_once() {
    let mut rng = rng();
    let clock = ManualClock::default();
    let mut client = client(&clock);

    for round in 0..ROUNDS / 4 {
        client.transport_mut().refuse_connect = rng.gen_bool(0.3);
        client.read_int_field(3, rng.gen_range(0..=9), None).unwrap();
        if client.transport().connected && rng.gen_bool(0.5) {
            client.transport_mut().deliver(&response("200 OK", "5"));
        }
        clock.advance(6_000);
        settle(&mut client);
        assert_eq!(client.handler().events.len(), round + 1);
        assert!(matches!(
            client.handler().events.last(),
            Some(Event::ReadInt(_))
        ));
        // Stale responses must not reach the next round.
        assert_eq!(client.transport().unread(), 0);
    }
}

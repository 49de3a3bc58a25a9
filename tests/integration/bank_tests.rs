//! Channel bank fan-out across several PCA9685 chips on one bus.

use starfield::drivers::channel_bank::ChannelBank;
use starfield::drivers::pca9685::{LED0_ON_L, MODE1, MODE2};
use starfield::error::{Error, RangeError, TransportError};

use super::mock_hw::{BusWrite, MockBus};

fn duties(n: usize) -> Vec<u16> {
    (0..n).map(|i| (i as u16 + 1) * 100).collect()
}

#[test]
fn construction_configures_every_chip() {
    let bank = ChannelBank::new(MockBus::new(64), 0x40, 40).unwrap();

    assert_eq!(bank.chip_count(), 3);
    let writes = &bank.bus().writes;
    assert_eq!(writes.len(), 6);
    for (k, pair) in writes.chunks(2).enumerate() {
        let addr = 0x40 + k as u8;
        assert_eq!(
            pair[0],
            BusWrite {
                address: addr,
                register: MODE1,
                data: vec![0x20]
            }
        );
        assert_eq!(
            pair[1],
            BusWrite {
                address: addr,
                register: MODE2,
                data: vec![0x10]
            }
        );
    }
}

#[test]
fn twenty_channels_span_two_chips_with_padding() {
    let mut bank = ChannelBank::new(MockBus::new(64), 0x40, 20).unwrap();
    bank.update(&duties(20)).unwrap();

    let frames = bank.bus().frame_writes();
    assert_eq!(frames.len(), 2);
    assert_eq!((frames[0].address, frames[0].register), (0x40, LED0_ON_L));
    assert_eq!((frames[1].address, frames[1].register), (0x41, LED0_ON_L));

    let chip0 = bank.bus().last_duties(0x40).unwrap();
    let chip1 = bank.bus().last_duties(0x41).unwrap();
    assert_eq!(chip0, duties(20)[..16]);
    assert_eq!(chip1[..4], duties(20)[16..]);
    assert_eq!(chip1[4..], [0; 12]);
}

#[test]
fn small_block_limit_splits_each_chip_in_order() {
    let mut bank = ChannelBank::new(MockBus::new(32), 0x40, 32).unwrap();
    bank.update(&duties(32)).unwrap();

    let frames = bank.bus().frame_writes();
    let order: Vec<(u8, u8)> = frames.iter().map(|w| (w.address, w.register)).collect();
    assert_eq!(order, [(0x40, 0x06), (0x40, 0x26), (0x41, 0x06), (0x41, 0x26)]);
    assert!(frames.iter().all(|w| w.data.len() == 32));

    // Channel 8 is the first record of the second half on chip 0.
    let hi = &frames[1].data;
    assert_eq!(u16::from(hi[2]) | (u16::from(hi[3]) << 8), 900);
}

#[test]
fn exact_chip_multiple_needs_no_padding() {
    let mut bank = ChannelBank::new(MockBus::new(64), 0x50, 16).unwrap();
    bank.update(&[0x0FFF; 16]).unwrap();

    assert_eq!(bank.chip_count(), 1);
    assert_eq!(bank.bus().last_duties(0x50), Some(vec![0x0FFF; 16]));
}

#[test]
fn wrong_frame_length_writes_nothing() {
    let mut bank = ChannelBank::new(MockBus::new(64), 0x40, 20).unwrap();
    let before = bank.bus().writes.len();

    let err = bank.update(&duties(19)).unwrap_err();
    assert!(matches!(
        err,
        Error::Range(RangeError::LengthMismatch {
            expected: 20,
            actual: 19
        })
    ));
    assert_eq!(bank.bus().writes.len(), before);
}

#[test]
fn transport_failure_stops_fan_out() {
    let mut bus = MockBus::new(64);
    // Four mode writes, then chip 0's frame succeeds and chip 1's fails.
    bus.fail_after = Some(5);
    let mut bank = ChannelBank::new(bus, 0x40, 20).unwrap();

    let err = bank.update(&duties(20)).unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Write {
            address: 0x41,
            register: LED0_ON_L,
            ..
        })
    ));
    assert_eq!(bank.bus().frame_writes().len(), 1);
}

#[test]
fn chips_never_wrap_past_the_last_address() {
    let err = ChannelBank::new(MockBus::new(64), 0x40, 4096).err().unwrap();
    assert!(matches!(
        err,
        Error::Range(RangeError::AddressOverflow {
            base: 0x40,
            chips: 256
        })
    ));

    let bank = ChannelBank::new(MockBus::new(64), 0x7f, 16).unwrap();
    assert!(bank.bus().writes.iter().all(|w| w.address == 0x7f));
    assert!(ChannelBank::new(MockBus::new(64), 0x7f, 17).is_err());
}

#[test]
fn failure_during_setup_is_reported() {
    let mut bus = MockBus::new(64);
    bus.fail_after = Some(0);

    let err = ChannelBank::new(bus, 0x40, 4).err().unwrap();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Write {
            address: 0x40,
            register: MODE1,
            ..
        })
    ));
}

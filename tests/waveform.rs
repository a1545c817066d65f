use pmod_dac::waveform::{Error, Waveform};

#[test]
fn ascending_ramp_is_end_exclusive() {
    let ramp = Waveform::ramp(0, 10, 1).unwrap();
    let values: Vec<u16> = ramp.iter().collect();
    assert_eq!(values, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn descending_ramp_is_end_exclusive() {
    let ramp = Waveform::ramp(10, 0, -1).unwrap();
    let values: Vec<u16> = ramp.iter().collect();
    assert_eq!(values, vec![10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
}

#[test]
fn step_may_overshoot_the_end() {
    let ramp = Waveform::ramp(0, 10, 3).unwrap();
    let values: Vec<u16> = ramp.iter().collect();
    assert_eq!(values, vec![0, 3, 6, 9]);
}

#[test]
fn inclusive_ramp_emits_the_end_when_hit() {
    let ramp = Waveform::ramp_inclusive(0, 10, 5).unwrap();
    let values: Vec<u16> = ramp.iter().collect();
    assert_eq!(values, vec![0, 5, 10]);

    // The endpoint is only emitted when the sweep lands on it.
    let ramp = Waveform::ramp_inclusive(0, 10, 4).unwrap();
    let values: Vec<u16> = ramp.iter().collect();
    assert_eq!(values, vec![0, 4, 8]);
}

#[test]
fn zero_step_is_rejected() {
    assert_eq!(Waveform::ramp(0, 0, 0).unwrap_err(), Error::ZeroStep);
    assert_eq!(Waveform::ramp(0, 10, 0).unwrap_err(), Error::ZeroStep);
    assert_eq!(Waveform::ramp(10, 0, 0).unwrap_err(), Error::ZeroStep);
    assert_eq!(
        Waveform::ramp_inclusive(3, 7, 0).unwrap_err(),
        Error::ZeroStep
    );
}

#[test]
fn degenerate_ramps_are_empty() {
    assert_eq!(Waveform::ramp(5, 5, 1).unwrap().iter().count(), 0);
    // A step pointing away from the end terminates immediately.
    assert_eq!(Waveform::ramp(0, 10, -1).unwrap().iter().count(), 0);
}

#[test]
fn levels_pass_through_in_order() {
    let samples = [4095, 0, 2048, 65535];
    let wave = Waveform::levels(&samples);
    let values: Vec<u16> = wave.iter().collect();
    assert_eq!(values, samples.to_vec());
}

#[test]
fn waveforms_are_restartable() {
    let samples = [1, 2, 3];
    let wave = Waveform::levels(&samples);
    let first: Vec<u16> = wave.iter().collect();
    let second: Vec<u16> = wave.iter().collect();
    assert_eq!(first, second);

    let ramp = Waveform::ramp(0, 100, 10).unwrap();
    let first: Vec<u16> = ramp.iter().collect();
    let second: Vec<u16> = ramp.iter().collect();
    assert_eq!(first.len(), 10);
    assert_eq!(first, second);
}

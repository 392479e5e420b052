use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(128, 255), 128);
    assert_eq!(mul_div255_u8(0, 200), 0);
    assert_eq!(mul_div255_u8(255, 128), 128);
}

#[test]
fn unit_channels_map_to_full_byte_range() {
    assert_eq!(unit_to_u8(0.0), 0);
    assert_eq!(unit_to_u8(1.0), 255);
    assert_eq!(unit_to_u8(0.5), 128);
    assert_eq!(unit_to_u8(7.0), 255);
}

#[test]
fn percent_maps_endpoints_and_clamps() {
    assert_eq!(percent_to_u8(0), 0);
    assert_eq!(percent_to_u8(100), 255);
    assert_eq!(percent_to_u8(50), 128);
    assert_eq!(percent_to_u8(250), 255);
}

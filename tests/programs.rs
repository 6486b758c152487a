use chip8vm::display::DummyDisplay;
use chip8vm::input::DummyInput;
use chip8vm::sound::Mute;
use chip8vm::{Config, Error, Machine, Register, RunState};

fn init_logging() {
    // several tests race to install it; only the first wins
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .init();
}

fn v(i: u8) -> Register {
    Register::new(i)
}

#[test]
fn test_prints_bcd_digits_with_font() -> Result<(), Error> {
    init_logging();
    #[rustfmt::skip]
    let prog = [
        0x6a, 0x7b, // VA = 123
        0xa3, 0x00, // I = 0x300
        0xfa, 0x33, // BCD VA
        0xf2, 0x65, // V0..V2 = digits
        0x63, 0x00, // V3 = x
        0x64, 0x00, // V4 = y
        0xf0, 0x29, 0xd3, 0x45, 0x73, 0x05,
        0xf1, 0x29, 0xd3, 0x45, 0x73, 0x05,
        0xf2, 0x29, 0xd3, 0x45,
        0x12, 0x1c, // spin
    ];
    let mut m = Machine::with_config(Config::default().with_font());
    m.load_program(&prog)?;
    assert_eq!(m.run(20)?, 20);

    assert_eq!(m.pc(), 0x21c);
    assert_eq!(&m.registers()[..3], &[1, 2, 3]);
    assert_eq!(m.v(Register::VF), 0);
    let fb = m.framebuffer();
    // top row of "1", "2" and "3"
    assert!(fb.pixel(2, 0));
    assert!(!fb.pixel(0, 0));
    assert!((5..9).all(|x| fb.pixel(x, 0)));
    assert!((10..14).all(|x| fb.pixel(x, 0)));
    // bottom row of "1" is 0x70
    assert!((1..4).all(|x| fb.pixel(x, 4)));
    Ok(())
}

#[test]
fn test_subroutine_countdown() -> Result<(), Error> {
    init_logging();
    #[rustfmt::skip]
    let prog = [
        0x60, 0x05, // 200: V0 = 5
        0x22, 0x0a, // 202: CALL 20a
        0x30, 0x00, // 204: SE V0, 0
        0x12, 0x02, // 206: JP 202
        0x12, 0x08, // 208: JP 208
        0x70, 0xff, // 20a: V0 -= 1
        0x71, 0x01, // 20c: V1 += 1
        0x00, 0xee, // 20e: RET
    ];
    let mut m = Machine::new();
    m.load_program(&prog)?;
    m.run(100)?;
    assert_eq!(m.pc(), 0x208);
    assert_eq!(m.v(v(0)), 0);
    assert_eq!(m.v(v(1)), 5);
    assert_eq!(m.sp(), 0);
    Ok(())
}

#[test]
fn test_host_loop_with_key_wait() -> Result<(), Error> {
    init_logging();
    #[rustfmt::skip]
    let prog = [
        0xf3, 0x0a, // wait for key into V3
        0xf3, 0x18, // ST = V3
        0x12, 0x04, // spin
    ];
    let mut m = Machine::new();
    m.load_program(&prog)?;
    let mut display = DummyDisplay::new();
    let mut input = DummyInput::new(&[]);
    let mut sound = Mute::new();

    for frame in 0..10 {
        if frame == 5 {
            input.hold(&[0x9]);
        }
        m.poll_input(&mut input)?;
        for _ in 0..8 {
            m.step()?;
        }
        m.tick_timers();
        m.present(&mut display)?;
        m.sync_sound(&mut sound)?;
        if frame < 5 {
            assert_eq!(m.state(), RunState::AwaitingKey { register: v(3) });
            assert!(!sound.is_beeping);
        }
    }
    assert_eq!(m.state(), RunState::Running);
    assert_eq!(m.v(v(3)), 9);
    // loaded with 9 in frame 5, ticked in frames 5..=9
    assert_eq!(m.sound_timer(), 4);
    assert!(sound.is_beeping);
    assert_eq!(display.frames_drawn, 10);
    Ok(())
}

#[test]
fn test_runs_off_the_end_of_memory() {
    init_logging();
    // zeroed memory is all SYS 000, which is ignored
    let mut m = Machine::new();
    let res = m.run(5000);
    assert!(matches!(
        res,
        Err(Error::AddressOutOfBounds { addr: 0x1000, len: 2 })
    ));
    assert_eq!(m.pc(), 0x1000);
}

#[test]
fn test_program_size_limits() {
    let mut m = Machine::new();
    let mut prog = vec![0u8; 3584];
    prog[3583] = 0xab;
    assert!(m.load_program(&prog).is_ok());
    assert_eq!(m.memory().as_slice()[4095], 0xab);

    let mut m = Machine::new();
    assert!(matches!(
        m.load_program(&[0xab; 3585]),
        Err(Error::ProgramTooLarge { len: 3585, max: 3584 })
    ));
    assert!(m.memory().as_slice().iter().all(|&b| b == 0));
}

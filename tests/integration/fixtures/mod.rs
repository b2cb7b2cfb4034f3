// Transcript excerpts in each known layout
// WHY: deterministic inputs shared by the end-to-end tests

#![allow(dead_code)]

/// Fellowship layout: speakers at column 20, dialogue at column 10
pub const FELLOWSHIP_TEXT: &str = "
                    FRODO
          The Ring! I will take it.
          I will take the Ring to Mordor.

                    GANDALF (V.O.)
          All we have to decide is what to do
          with the time that is given to us.

INT. BAG END - NIGHT

                    SAM
          Mr. Frodo! The Ring!
                    FRODO
          Sam, we go together.
";

/// Two Towers layout: speakers at column 28, dialogue at column 12,
/// two trailing characters trimmed from speaker names
pub const TOWERS_TEXT: &str = "
                            GOLLUM  :
            We wants it, we needs it. Must have the precious.
                            SAM  :
            The Ring is not yours.
                            EOMER  :
            Riders of Rohan!
";

/// Return of the King layout: speakers at column 24, dialogue at column 12,
/// voice-over and off-screen tags removed from speaker names
pub const KING_TEXT_UTF8: &str = "
                        THÉODEN V/O
            Ride now, ride to ruin and the world's ending.
                        ÉOMER O.S.
            The Ring of power!
                        SAM
            I can't carry it for you, but I can carry you.
";

/// Speakers with no dialogue and orphan dialogue before any speaker
pub const ORPHAN_TEXT: &str = "
          Orphan dialogue nobody speaks.
                    ARAGORN
                    BOROMIR
          One does not simply walk into Mordor.
";

/// Windows-1252 encoding of KING_TEXT_UTF8
pub fn king_text_windows_1252() -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(KING_TEXT_UTF8);
    assert!(!had_errors, "fixture must be representable in Windows-1252");
    bytes.into_owned()
}

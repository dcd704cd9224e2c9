use std::{
    io::{self, Write},
    mem::MaybeUninit,
    os::fd::{AsRawFd, RawFd},
};

use core_2048::Board;

const SQUARE_HEIGHT: usize = 3;
const SQUARE_WIDTH: usize = 7;
const COLOUR_TABLE: [u8; 7] = [90, 33, 31, 32, 33, 36, 35];

// Score line, top border, then each row of squares followed by a separator
// or the bottom border.
const fn frame_lines(size: usize) -> usize {
    2 + size * (SQUARE_HEIGHT + 1)
}

const fn row_line(row: usize) -> usize {
    2 + row * (SQUARE_HEIGHT + 1)
}

fn border_row(size: usize, left: &str, middle: &str, right: &str) -> String {
    let mut line = String::from(left);

    for i in 0..size {
        if i != 0 {
            line.push_str(middle);
        }

        line.push_str(&"━".repeat(SQUARE_WIDTH));
    }

    line.push_str(right);
    line.push('\n');
    line
}

fn tile_colour(value: u32) -> Option<u8> {
    let exponent = value.trailing_zeros() as usize;

    (value != 0).then(|| COLOUR_TABLE[(exponent - 1) % COLOUR_TABLE.len()])
}

fn draw_board_row(out: &mut impl Write, row: &[u32]) -> io::Result<()> {
    for line in 0..SQUARE_HEIGHT {
        for &value in row {
            match tile_colour(value) {
                Some(colour) if line == (SQUARE_HEIGHT - 1) / 2 => {
                    write!(out, "┃\x1b[7m\x1b[{colour}m{value:^SQUARE_WIDTH$}\x1b[m")?;
                }
                Some(colour) => {
                    let background = colour + 10;
                    write!(out, "┃\x1b[{background}m{:SQUARE_WIDTH$}\x1b[m", "")?;
                }
                None => write!(out, "┃{:SQUARE_WIDTH$}", "")?,
            }
        }

        out.write_all("┃\x1b[E".as_bytes())?;
    }

    Ok(())
}

fn move_cursor(out: &mut impl Write, from: usize, to: usize) -> io::Result<()> {
    if to < from {
        write!(out, "\x1b[{}F", from - to)
    } else if to > from {
        write!(out, "\x1b[{}E", to - from)
    } else {
        out.write_all(b"\r")
    }
}

/// Draws a fresh frame below the cursor, leaving the cursor on the line after
/// it.
pub fn draw_board(out: &mut impl Write, board: &Board, score: u64) -> io::Result<()> {
    let size = board.size();
    let empty_row = format!("{}┃\n", format!("┃{:SQUARE_WIDTH$}", "").repeat(size));

    write!(out, "\nScore: {score}\n")?;
    out.write_all(border_row(size, "┏", "┳", "┓").as_bytes())?;

    for i in 0..size {
        if i != 0 {
            out.write_all(border_row(size, "┣", "╋", "┫").as_bytes())?;
        }

        for _ in 0..SQUARE_HEIGHT {
            out.write_all(empty_row.as_bytes())?;
        }
    }

    out.write_all(border_row(size, "┗", "┻", "┛").as_bytes())?;

    redraw_board(out, &Board::new(size), board, score, score)
}

/// Updates a frame drawn by [`draw_board`], touching only the score line and
/// the rows that differ between `old_board` and `new_board`.
pub fn redraw_board(
    out: &mut impl Write,
    old_board: &Board,
    new_board: &Board,
    old_score: u64,
    new_score: u64,
) -> io::Result<()> {
    let bottom = frame_lines(new_board.size());
    let mut current_line = bottom;

    if new_score != old_score {
        move_cursor(out, current_line, 0)?;
        write!(out, "Score: {new_score}\x1b[K")?;
        current_line = 0;
    }

    let changed_rows = old_board
        .rows()
        .zip(new_board.rows())
        .enumerate()
        .filter(|(_, (old_row, new_row))| old_row != new_row);

    for (i, (_, row)) in changed_rows {
        let target_line = row_line(i);

        move_cursor(out, current_line, target_line)?;
        draw_board_row(out, row)?;
        current_line = target_line + SQUARE_HEIGHT;
    }

    if current_line != bottom {
        move_cursor(out, current_line, bottom)?;
        out.flush()?;
    }

    Ok(())
}

/// Restores the terminal settings saved by [`setup_terminal`] when dropped.
pub struct TerminalGuard {
    fd: RawFd,
    original: libc::termios,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSADRAIN, &self.original);
        }
    }
}

/// Switches off echo and line buffering so single key presses can be read.
pub fn setup_terminal(fd: &impl AsRawFd) -> io::Result<TerminalGuard> {
    let fd = fd.as_raw_fd();
    let mut termios = MaybeUninit::uninit();

    let original = unsafe {
        if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
            return Err(io::Error::last_os_error());
        }

        termios.assume_init()
    };

    let mut termios = original;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON);

    unsafe {
        if libc::tcsetattr(fd, libc::TCSADRAIN, &termios) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(TerminalGuard { fd, original })
}

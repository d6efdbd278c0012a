// ── Typed wrappers ────────────────────────────────────────────────────────────
//
// Thin `Chain` methods for the calls a plain Win32 window needs, taking and
// returning windows-crate types.  Each one resolves in the library that
// exports it, by exact name, and uses that entry point's own error signal.

use std::ffi::c_void;

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{HINSTANCE, HMODULE, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::{HDC, PAINTSTRUCT},
        UI::WindowsAndMessaging::{
            HMENU, MESSAGEBOX_RESULT, MESSAGEBOX_STYLE, MSG, SHOW_WINDOW_CMD, WINDOW_EX_STYLE,
            WINDOW_STYLE, WNDCLASSEXW,
        },
    },
};

use crate::{args, backend::Backend, chain::Chain};

const KERNEL32: &str = "kernel32.dll";
const USER32: &str = "user32.dll";

impl<B: Backend> Chain<'_, B> {
    /// `GetModuleHandleW`; null `name` means the calling executable.
    pub fn get_module_handle(&mut self, name: PCWSTR) -> HMODULE {
        let r = self.lib(KERNEL32).call_nonzero("GetModuleHandleW", args![name.0]);
        HMODULE(r as *mut c_void)
    }

    pub fn def_window_proc(&mut self, hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
        let r = self
            .lib(USER32)
            .call_any("DefWindowProcW", args![hwnd.0, msg, wparam.0, lparam.0]);
        LRESULT(r as isize)
    }

    /// `RegisterClassExW`; returns the class atom.
    pub fn register_class_ex(&mut self, wc: &WNDCLASSEXW) -> u16 {
        self.lib(USER32).call_nonzero("RegisterClassExW", args![wc]) as u16
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_window_ex(
        &mut self,
        ex_style: WINDOW_EX_STYLE,
        class_name: PCWSTR,
        window_name: PCWSTR,
        style: WINDOW_STYLE,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        parent: HWND,
        menu: HMENU,
        instance: HINSTANCE,
        param: *const c_void,
    ) -> HWND {
        let r = self.lib(USER32).call_nonzero(
            "CreateWindowExW",
            args![
                ex_style.0,
                class_name.0,
                window_name.0,
                style.0,
                x,
                y,
                width,
                height,
                parent.0,
                menu.0,
                instance.0,
                param,
            ],
        );
        HWND(r as *mut c_void)
    }

    /// `ShowWindow`; returns whether the window was previously visible.
    pub fn show_window(&mut self, hwnd: HWND, cmd: SHOW_WINDOW_CMD) -> bool {
        self.lib(USER32).call_any("ShowWindow", args![hwnd.0, cmd.0]) != 0
    }

    pub fn update_window(&mut self, hwnd: HWND) {
        self.lib(USER32).call_nonzero("UpdateWindow", args![hwnd.0]);
    }

    /// `GetMessageW`.  Fails the chain only on -1; returns `false` on WM_QUIT.
    pub fn get_message(&mut self, msg: &mut MSG, hwnd: HWND, filter_min: u32, filter_max: u32) -> bool {
        let (r, err) = self
            .lib(USER32)
            .call_raw("GetMessageW", args![msg, hwnd.0, filter_min, filter_max]);
        // BOOL is 32 bits; the upper half of the return register is undefined.
        let r = r as u32 as i32;
        if r == -1 {
            self.fail(err, "GetMessage");
        }
        r != 0
    }

    pub fn translate_message(&mut self, msg: &MSG) -> bool {
        self.lib(USER32).call_any("TranslateMessage", args![msg]) as u32 != 0
    }

    pub fn dispatch_message(&mut self, msg: &MSG) -> LRESULT {
        LRESULT(self.lib(USER32).call_any("DispatchMessageW", args![msg]) as isize)
    }

    pub fn destroy_window(&mut self, hwnd: HWND) {
        self.lib(USER32).call_nonzero("DestroyWindow", args![hwnd.0]);
    }

    pub fn post_quit_message(&mut self, exit_code: i32) {
        self.lib(USER32).call_any("PostQuitMessage", args![exit_code]);
    }

    /// `BeginPaint`.  Pair with `end_paint` on a detached chain.
    pub fn begin_paint(&mut self, hwnd: HWND, ps: &mut PAINTSTRUCT) -> HDC {
        HDC(self.lib(USER32).call_nonzero("BeginPaint", args![hwnd.0, ps]) as *mut c_void)
    }

    pub fn end_paint(&mut self, hwnd: HWND, ps: &PAINTSTRUCT) {
        self.lib(USER32).call_nonzero("EndPaint", args![hwnd.0, ps]);
    }

    /// `MessageBox`, resolved by name across all libraries (picks `MessageBoxW`).
    pub fn message_box(
        &mut self,
        hwnd: HWND,
        text: PCWSTR,
        caption: PCWSTR,
        style: MESSAGEBOX_STYLE,
    ) -> MESSAGEBOX_RESULT {
        let r = self.call_nonzero("MessageBox", args![hwnd.0, text.0, caption.0, style.0]);
        MESSAGEBOX_RESULT(r as i32)
    }
}
